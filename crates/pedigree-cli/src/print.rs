//! Plain-text output for the one-shot commands.

use std::fmt::Write;

use pedigree_core::lineage::resolve_parent;
use pedigree_core::{Horse, TreeNode};

const HEADERS: [&str; 7] = ["ID", "NAME", "BREED", "AGE", "SEX", "FATHER", "MOTHER"];

/// Aligned table of every horse with its parents' names.
pub fn horse_table(horses: &[Horse]) -> String {
    if horses.is_empty() {
        return "No horses registered.\n".to_string();
    }

    let rows: Vec<[String; 7]> = horses
        .iter()
        .map(|horse| {
            [
                horse.id.to_string(),
                horse.name.clone(),
                horse.breed.clone(),
                horse.age.map(|a| a.to_string()).unwrap_or_default(),
                horse.sex.map(|s| s.to_string()).unwrap_or_default(),
                resolve_parent(horses, horse.father_id.as_ref()).label().to_string(),
                resolve_parent(horses, horse.mother_id.as_ref()).label().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// Indented ancestry tree, father branch first.
pub fn ancestry(root: &TreeNode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", node_label(root));
    push_children(&mut out, root, "");
    out
}

fn push_children(out: &mut String, node: &TreeNode, prefix: &str) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let _ = writeln!(out, "{}{}{}", prefix, branch, node_label(child));
        push_children(out, child, &format!("{}{}", prefix, indent));
    }
}

fn node_label(node: &TreeNode) -> String {
    if node.breed.is_empty() {
        node.name.clone()
    } else {
        format!("{} ({})", node.name, node.breed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedigree_core::{materialize, Sex};

    fn stable() -> Vec<Horse> {
        vec![
            Horse::new("1", "Trovão").with_sex(Sex::Male).with_breed("Crioulo"),
            Horse::new("2", "Brisa").with_sex(Sex::Female),
            Horse::new("3", "Relâmpago")
                .with_age(2)
                .with_father("1")
                .with_mother("9"),
        ]
    }

    #[test]
    fn test_table_resolves_parents() {
        let table = horse_table(&stable());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID  NAME"));
        assert!(lines[3].contains("Trovão"));
        assert!(lines[3].ends_with("Unknown"));
        assert!(lines[1].ends_with("Not registered  Not registered"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(horse_table(&[]), "No horses registered.\n");
    }

    #[test]
    fn test_ancestry_drawing() {
        let mut horses = stable();
        horses[2].mother_id = Some("2".into());
        let tree = materialize(horses.get(2), &horses, 5).unwrap();
        assert_eq!(
            ancestry(&tree),
            "Relâmpago\n├── Trovão (Crioulo)\n└── Brisa\n"
        );
    }
}
