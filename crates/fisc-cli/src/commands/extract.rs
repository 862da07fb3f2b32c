use fisc_trace::extract;

use crate::cli::ExtractArgs;

pub fn handle(args: &ExtractArgs) -> anyhow::Result<()> {
    let lines = super::read_tree_lines(&args.tree)?;
    for line in extract(&lines, &args.variable) {
        println!("{line}");
    }
    Ok(())
}
