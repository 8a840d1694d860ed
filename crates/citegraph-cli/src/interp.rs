//! Line-oriented command interpreter over a citation graph.
//!
//! One command per line, whitespace-separated, `#` starts a comment:
//!
//! ```text
//! create <id> <parent>...   cite <child> <parent>   remove <id>
//! exists <id>               parents <id>            children <id>
//! ancestors <id>            descendants <id>        show <id>
//! list                      root
//! ```
//!
//! Commands that fail leave the graph untouched; the caller decides whether
//! to keep going. `cite` warns (and still applies) when the new edge closes
//! an owning-edge cycle; cycle discipline is the caller's job, the warning
//! is the courtesy.

use anyhow::{Context, bail};
use citegraph_core::{CitationGraph, Paper, Publication};

use crate::output::Outcome;

pub struct Session {
    graph: CitationGraph<Paper>,
}

impl Session {
    pub fn new(root_id: String) -> Self {
        Self {
            graph: CitationGraph::new(root_id),
        }
    }

    /// Evaluate one input line. Blank lines and comments produce no
    /// outcomes; every command produces at least one.
    pub fn eval(&mut self, line: &str) -> anyhow::Result<Vec<Outcome>> {
        let line = line.split('#').next().unwrap_or_default();
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Vec::new());
        };
        let args: Vec<&str> = words.collect();

        match command {
            "create" => {
                let (id, parents) = args
                    .split_first()
                    .context("usage: create <id> <parent>...")?;
                if parents.is_empty() {
                    bail!("usage: create <id> <parent>...");
                }
                let parent_ids: Vec<String> =
                    parents.iter().map(|p| (*p).to_string()).collect();
                self.graph.create((*id).to_string(), &parent_ids)?;
                Ok(vec![Outcome::Applied {
                    op: "create".into(),
                    id: (*id).to_string(),
                }])
            }
            "cite" => {
                let [child, parent] = args[..] else {
                    bail!("usage: cite <child> <parent>");
                };
                let (child, parent) = (child.to_string(), parent.to_string());

                let mut outcomes = Vec::new();
                if self.graph.would_create_cycle(&child, &parent)? {
                    outcomes.push(Outcome::Warning {
                        message: format!(
                            "citation {parent} -> {child} closes an owning-edge cycle; \
                             the publications on it will never be reclaimed"
                        ),
                    });
                }
                self.graph.add_citation(&child, &parent)?;
                outcomes.push(Outcome::Applied {
                    op: "cite".into(),
                    id: child,
                });
                Ok(outcomes)
            }
            "remove" => {
                let [id] = args[..] else {
                    bail!("usage: remove <id>");
                };
                self.graph.remove(&id.to_string())?;
                Ok(vec![Outcome::Applied {
                    op: "remove".into(),
                    id: id.to_string(),
                }])
            }
            "exists" => {
                let [id] = args[..] else {
                    bail!("usage: exists <id>");
                };
                Ok(vec![Outcome::Truth {
                    query: "exists".into(),
                    value: self.graph.exists(&id.to_string()),
                }])
            }
            "parents" => self.id_list_query("parents", &args, CitationGraph::parents_of),
            "children" => self.id_list_query("children", &args, CitationGraph::children_of),
            "ancestors" => self.id_list_query("ancestors", &args, |g, id| {
                g.ancestors(id).map(|set| set.into_iter().collect())
            }),
            "descendants" => self.id_list_query("descendants", &args, |g, id| {
                g.descendants(id).map(|set| set.into_iter().collect())
            }),
            "show" => {
                let [id] = args[..] else {
                    bail!("usage: show <id>");
                };
                let paper = self.graph.get(&id.to_string())?;
                Ok(vec![Outcome::Id {
                    query: "show".into(),
                    id: paper.id().clone(),
                }])
            }
            "root" => Ok(vec![Outcome::Id {
                query: "root".into(),
                id: self.graph.root_id().clone(),
            }]),
            "list" => Ok(vec![Outcome::IdList {
                query: "list".into(),
                ids: self.graph.ids().cloned().collect(),
            }]),
            other => bail!("unknown command: {other}"),
        }
    }

    fn id_list_query(
        &self,
        query: &str,
        args: &[&str],
        f: impl Fn(
            &CitationGraph<Paper>,
            &String,
        ) -> Result<Vec<String>, citegraph_core::GraphError<String>>,
    ) -> anyhow::Result<Vec<Outcome>> {
        let [id] = *args else {
            bail!("usage: {query} <id>");
        };
        let ids = f(&self.graph, &id.to_string())?;
        Ok(vec![Outcome::IdList {
            query: query.into(),
            ids,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::output::Outcome;

    fn session() -> Session {
        Session::new("root".to_string())
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        let mut s = session();
        assert!(s.eval("").unwrap().is_empty());
        assert!(s.eval("   ").unwrap().is_empty());
        assert!(s.eval("# create a root").unwrap().is_empty());
        assert!(s.eval("exists a # trailing comment").unwrap().len() == 1);
    }

    #[test]
    fn create_query_remove_round_trip() {
        let mut s = session();
        s.eval("create a root").unwrap();
        s.eval("create b a").unwrap();

        assert_eq!(
            s.eval("children a").unwrap(),
            [Outcome::IdList {
                query: "children".into(),
                ids: vec!["b".into()],
            }]
        );

        s.eval("remove a").unwrap();
        assert_eq!(
            s.eval("exists b").unwrap(),
            [Outcome::Truth {
                query: "exists".into(),
                value: false,
            }]
        );
    }

    #[test]
    fn graph_errors_surface_as_command_errors() {
        let mut s = session();
        assert!(s.eval("create a ghost").is_err());
        assert!(s.eval("remove root").is_err());
        assert!(s.eval("parents ghost").is_err());
        // The failures left nothing behind.
        assert_eq!(
            s.eval("list").unwrap(),
            [Outcome::IdList {
                query: "list".into(),
                ids: vec!["root".into()],
            }]
        );
    }

    #[test]
    fn malformed_commands_are_rejected() {
        let mut s = session();
        assert!(s.eval("create").is_err());
        assert!(s.eval("create lonely").is_err());
        assert!(s.eval("cite a").is_err());
        assert!(s.eval("frobnicate x").is_err());
    }

    #[test]
    fn cycle_closing_cite_warns_but_applies() {
        let mut s = session();
        s.eval("create a root").unwrap();
        s.eval("create b a").unwrap();

        let outcomes = s.eval("cite a b").unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], Outcome::Warning { .. }));
        assert!(matches!(outcomes[1], Outcome::Applied { .. }));
    }
}
