//! Department tree and colleague search

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::Collation;
use crate::error::DirectoryError;
use crate::types::{Department, DirectoryUser, UserStatus};

type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// Presence counts over the whole directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectoryStats {
    pub online: usize,
    pub away: usize,
    pub busy: usize,
    pub offline: usize,
    pub total: usize,
}

/// Organization directory with expansion, selection and search state
///
/// Tree structure is always derived from the flat department list; only
/// the expanded ids, the selected id and the query are stored.
#[derive(Debug)]
pub struct DirectoryIndex {
    departments: Vec<Department>,
    users: Vec<DirectoryUser>,
    root_id: String,
    expanded: HashSet<String>,
    selected: Option<String>,
    query: String,
    collation: Collation,
}

impl DirectoryIndex {
    /// Build the index, rejecting duplicate ids, dangling parents and cycles
    pub fn new(
        mut departments: Vec<Department>,
        users: Vec<DirectoryUser>,
        root_id: impl Into<String>,
    ) -> DirectoryResult<Self> {
        let depths = compute_depths(&departments)?;
        for (dept, depth) in departments.iter_mut().zip(depths) {
            if dept.level != depth {
                debug!("Department {} level {} corrected to {}", dept.id, dept.level, depth);
                dept.level = depth;
            }
        }

        info!(
            "Directory loaded: {} departments, {} users",
            departments.len(),
            users.len()
        );

        Ok(Self {
            departments,
            users,
            root_id: root_id.into(),
            expanded: HashSet::new(),
            selected: None,
            query: String::new(),
            collation: Collation::default(),
        })
    }

    /// Order sibling departments with `collation` instead of the default pinyin order
    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    pub fn collation(&self) -> Collation {
        self.collation
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn users(&self) -> &[DirectoryUser] {
        &self.users
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    fn require(&self, id: &str) -> DirectoryResult<()> {
        if self.department(id).is_some() {
            Ok(())
        } else {
            Err(DirectoryError::DepartmentNotFound(id.to_string()))
        }
    }

    /// Immediate children of `parent_id` (roots for `None`), sorted by name
    ///
    /// Ties on the collation key fall back to the raw name, then the id.
    pub fn build_subtree(&self, parent_id: Option<&str>) -> Vec<&Department> {
        let mut children: Vec<&Department> = self
            .departments
            .iter()
            .filter(|d| d.parent_id.as_deref() == parent_id)
            .collect();
        children.sort_by_cached_key(|d| {
            (self.collation.key(&d.name), d.name.clone(), d.id.clone())
        });
        children
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.departments
            .iter()
            .any(|d| d.parent_id.as_deref() == Some(id))
    }

    // === Expansion ===

    /// Flip expansion of `id`, returning whether it is now expanded
    pub fn toggle_expanded(&mut self, id: &str) -> DirectoryResult<bool> {
        self.require(id)?;
        if self.expanded.remove(id) {
            Ok(false)
        } else {
            self.expanded.insert(id.to_string());
            Ok(true)
        }
    }

    pub fn expand(&mut self, id: &str) -> DirectoryResult<()> {
        self.require(id)?;
        self.expanded.insert(id.to_string());
        Ok(())
    }

    pub fn collapse(&mut self, id: &str) {
        self.expanded.remove(id);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Expand every known id in `ids`, ignoring unknown ones
    pub fn expand_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            if self.expand(id).is_err() {
                debug!("Ignoring unknown department {} in expansion list", id);
            }
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Departments reachable through expanded ancestors, depth first, with depth
    pub fn visible_departments(&self) -> Vec<(usize, &Department)> {
        let mut rows = Vec::new();
        self.collect_visible(None, 0, &mut rows);
        rows
    }

    fn collect_visible<'a>(
        &'a self,
        parent_id: Option<&str>,
        depth: usize,
        rows: &mut Vec<(usize, &'a Department)>,
    ) {
        for dept in self.build_subtree(parent_id) {
            rows.push((depth, dept));
            if self.is_expanded(&dept.id) {
                self.collect_visible(Some(dept.id.as_str()), depth + 1, rows);
            }
        }
    }

    // === Selection and search ===

    /// Select a department; expansion is left untouched
    pub fn select_department(&mut self, id: &str) -> DirectoryResult<()> {
        self.require(id)?;
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Users matching the query and the selected department
    ///
    /// Selecting the root department disables the department filter.
    pub fn filtered_users(&self) -> Vec<&DirectoryUser> {
        let query = self.query.trim().to_lowercase();
        let department = self
            .selected
            .as_deref()
            .filter(|id| *id != self.root_id);

        self.users
            .iter()
            .filter(|u| query.is_empty() || u.matches(&query))
            .filter(|u| department.map_or(true, |id| u.department_id == id))
            .collect()
    }

    pub fn find_user(&self, id: &str) -> DirectoryResult<&DirectoryUser> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| DirectoryError::UserNotFound(id.to_string()))
    }

    pub fn stats(&self) -> DirectoryStats {
        let mut stats = DirectoryStats {
            total: self.users.len(),
            ..Default::default()
        };
        for user in &self.users {
            match user.status {
                UserStatus::Online => stats.online += 1,
                UserStatus::Away => stats.away += 1,
                UserStatus::Busy => stats.busy += 1,
                UserStatus::Offline => stats.offline += 1,
            }
        }
        stats
    }
}

/// Depth of every department in input order; fails on duplicates, dangling parents or cycles
fn compute_depths(departments: &[Department]) -> DirectoryResult<Vec<u32>> {
    let mut parents: HashMap<&str, Option<&str>> = HashMap::with_capacity(departments.len());
    for dept in departments {
        if parents
            .insert(dept.id.as_str(), dept.parent_id.as_deref())
            .is_some()
        {
            return Err(DirectoryError::DuplicateDepartment(dept.id.clone()));
        }
    }

    let mut depths = Vec::with_capacity(departments.len());
    for dept in departments {
        let mut depth = 0u32;
        let mut current = dept.parent_id.as_deref();
        while let Some(parent_id) = current {
            let Some(next) = parents.get(parent_id) else {
                return Err(DirectoryError::DanglingParent {
                    id: dept.id.clone(),
                    parent_id: parent_id.to_string(),
                });
            };
            depth += 1;
            if depth as usize > departments.len() {
                return Err(DirectoryError::Cycle(dept.id.clone()));
            }
            current = *next;
        }
        depths.push(depth);
    }
    Ok(depths)
}
