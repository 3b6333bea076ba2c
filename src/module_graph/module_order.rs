use std::collections::HashMap;

use indexmap::IndexMap;

use crate::diagnostics::{Diagnostic, IMPORT_CYCLE};

use super::{ModuleId, ModuleNode};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Post-order DFS from the entry: every module comes after the modules it
/// requires. Requires are followed in source order, so among independent
/// modules the one discovered first is placed first.
pub(super) fn topo_order(
    nodes: &IndexMap<ModuleId, ModuleNode>,
    entry: &ModuleId,
) -> Result<Vec<ModuleId>, Box<Diagnostic>> {
    let mut colors: HashMap<ModuleId, Color> = HashMap::new();
    let mut stack: Vec<ModuleId> = Vec::new();
    let mut order: Vec<ModuleId> = Vec::new();

    fn dfs(
        id: &ModuleId,
        nodes: &IndexMap<ModuleId, ModuleNode>,
        colors: &mut HashMap<ModuleId, Color>,
        stack: &mut Vec<ModuleId>,
        order: &mut Vec<ModuleId>,
    ) -> Result<(), Vec<ModuleId>> {
        colors.insert(id.clone(), Color::Gray);
        stack.push(id.clone());

        if let Some(node) = nodes.get(id) {
            for edge in &node.requires {
                let next = &edge.target;
                match colors.get(next).copied().unwrap_or(Color::White) {
                    Color::White => dfs(next, nodes, colors, stack, order)?,
                    Color::Gray => {
                        if let Some(start) = stack.iter().position(|item| item == next) {
                            let mut cycle = stack[start..].to_vec();
                            cycle.push(next.clone());
                            return Err(cycle);
                        }
                    }
                    Color::Black => {}
                }
            }
        }

        stack.pop();
        colors.insert(id.clone(), Color::Black);
        order.push(id.clone());
        Ok(())
    }

    if let Err(cycle) = dfs(entry, nodes, &mut colors, &mut stack, &mut order) {
        let cycle_str = cycle
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");

        // Point at the require that closes the cycle.
        let closing = cycle.len().checked_sub(2).and_then(|i| {
            let from = nodes.get(&cycle[i])?;
            let to = &cycle[i + 1];
            let edge = from.requires.iter().find(|edge| &edge.target == to)?;
            Some((from.file.display_path.clone(), edge.span))
        });
        let (file, span) = closing.unwrap_or_default();

        let diag = Diagnostic::make_error(&IMPORT_CYCLE, &[&cycle_str], file, span);
        return Err(Box::new(diag));
    }

    Ok(order)
}
