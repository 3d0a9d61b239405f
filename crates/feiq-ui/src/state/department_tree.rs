//! Department tree rows (left pane of the organization view)

use feiq_core::DirectoryIndex;

/// Indent per tree level in pixels
pub const TREE_INDENT: f32 = 16.0;

/// One rendered row of the department tree
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentTreeRow {
    /// Department id, also the key for expansion state
    pub id: String,
    /// Display name
    pub name: String,
    /// Depth below the root
    pub depth: usize,
    pub member_count: u32,
    /// Whether a chevron is drawn
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
}

impl DepartmentTreeRow {
    /// Left padding for this row
    pub fn indent(&self) -> f32 {
        self.depth as f32 * TREE_INDENT
    }

    /// Chevron icon name, if any
    pub fn chevron(&self) -> Option<&'static str> {
        match (self.has_children, self.is_expanded) {
            (false, _) => None,
            (true, true) => Some("chevron-down"),
            (true, false) => Some("chevron-right"),
        }
    }
}

/// Flatten the visible part of the tree for rendering
pub fn department_rows(index: &DirectoryIndex) -> Vec<DepartmentTreeRow> {
    index
        .visible_departments()
        .into_iter()
        .map(|(depth, dept)| DepartmentTreeRow {
            id: dept.id.clone(),
            name: dept.name.clone(),
            depth,
            member_count: dept.member_count,
            has_children: index.has_children(&dept.id),
            is_expanded: index.is_expanded(&dept.id),
            is_selected: index.selected() == Some(dept.id.as_str()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use feiq_core::Department;

    fn index() -> DirectoryIndex {
        DirectoryIndex::new(
            vec![
                Department::new("root", "Root", None),
                Department::new("child1", "Child 1", Some("root")),
                Department::new("child2", "Child 2", Some("root")),
                Department::new("grandchild", "Grandchild", Some("child1")),
            ],
            Vec::new(),
            "root",
        )
        .unwrap()
    }

    #[test]
    fn test_collapsed_tree_shows_roots() {
        let rows = department_rows(&index());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].chevron(), Some("chevron-right"));
    }

    #[test]
    fn test_expanded_rows_depth() {
        let mut index = index();
        index.expand("root").unwrap();

        let rows = department_rows(&index);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].depth, 0); // root at depth 0
        assert_eq!(rows[1].depth, 1); // child1 at depth 1
        assert_eq!(rows[2].depth, 1); // child2 at depth 1
        assert_eq!(rows[1].indent(), TREE_INDENT);
        assert_eq!(rows[2].chevron(), None);
    }

    #[test]
    fn test_selection_flag() {
        let mut index = index();
        index.expand("root").unwrap();
        index.select_department("child2").unwrap();

        let rows = department_rows(&index);
        let selected: Vec<_> = rows.iter().filter(|r| r.is_selected).map(|r| r.id.as_str()).collect();
        assert_eq!(selected, vec!["child2"]);
    }
}
