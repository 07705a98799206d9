//! The static table of known software and task recommendations.

use std::collections::BTreeMap;

/// Name, latest version and description.
const SOFTWARE: &[(&str, &str, &str)] = &[
    ("python", "3.11.0", "Python programming language"),
    ("git", "2.43.0", "Version control system"),
    ("vscode", "1.87.2", "Visual Studio Code editor"),
    ("nodejs", "21.6.0", "JavaScript runtime environment"),
    ("docker", "25.0.1", "Container platform"),
    ("java", "21.0.1", "Java development kit"),
    ("mysql", "8.3.0", "MySQL database server"),
    ("postgresql", "16.1", "PostgreSQL database server"),
];

const TASKS: &[(&str, &[&str])] = &[
    ("web development", &["python", "nodejs", "vscode", "git"]),
    ("data science", &["python", "nodejs", "git"]),
    ("database", &["mysql", "postgresql", "git"]),
    ("containerization", &["docker", "git"]),
    ("java development", &["java", "vscode", "git"]),
    (
        "full stack",
        &["python", "nodejs", "mysql", "docker", "vscode", "git"],
    ),
];

/// Catalog data for one piece of software.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub description: String,
    pub latest_version: String,
}

/// Known software keyed by lower-case name, plus the software recommended
/// for each task. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    software: BTreeMap<String, CatalogEntry>,
    tasks: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn new(
        software: BTreeMap<String, CatalogEntry>,
        tasks: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self { software, tasks }
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        let software = SOFTWARE
            .iter()
            .map(|(name, version, description)| {
                (
                    name.to_string(),
                    CatalogEntry {
                        description: description.to_string(),
                        latest_version: version.to_string(),
                    },
                )
            })
            .collect();

        let tasks = TASKS
            .iter()
            .map(|(task, names)| {
                (
                    task.to_string(),
                    names.iter().map(|n| n.to_string()).collect(),
                )
            })
            .collect();

        Self::new(software, tasks)
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.software.get(name)
    }

    pub fn recommendations(&self, task: &str) -> Option<&[String]> {
        self.tasks.get(task).map(Vec::as_slice)
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.get("git").unwrap().latest_version, "2.43.0");
        assert_eq!(catalog.get("postgresql").unwrap().latest_version, "16.1");
        assert!(catalog.get("emacs").is_none());
    }

    #[test]
    fn test_every_recommendation_is_in_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.task_names().count(), 6);
        for task in catalog.task_names() {
            for name in catalog.recommendations(task).unwrap() {
                assert!(catalog.get(name).is_some(), "{name} missing for {task}");
            }
        }
    }
}
