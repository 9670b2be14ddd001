//! Check-graph command implementation.

use crate::cli::CheckGraphArgs;
use crate::error::Result;
use crate::loader;
use crate::output::Formatter;
use caelus_domain::EdgeKind;

/// Execute the check-graph command.
///
/// Builds the requirement graph from the given records and reports its
/// shape. Structural errors (duplicate ids, dependency cycles, double
/// supersession, unknown endpoints) surface here exactly as they would at
/// assessment time.
pub fn execute_check_graph(args: CheckGraphArgs, formatter: &Formatter) -> Result<()> {
    let graph = loader::load_graph(&args.requirements, args.edges.as_deref())?;

    let active = graph.active_requirements().count();
    let superseded = graph.len() - active;

    println!(
        "{}",
        formatter.success(&format!(
            "Graph is well-formed: {} requirement(s) ({} active, {} superseded)",
            graph.len(),
            active,
            superseded
        ))
    );

    for kind in [
        EdgeKind::Supersedes,
        EdgeKind::DependsOn,
        EdgeKind::CrossReferences,
        EdgeKind::ConflictsWith,
    ] {
        let count = graph.edges_of_kind(kind).count();
        if count > 0 {
            println!("  {}: {} edge(s)", kind.as_str(), count);
        }
    }

    Ok(())
}
