//! Output layer for human/JSON parity across interpreter commands.
//!
//! Every command produces an [`Outcome`]; rendering happens in exactly one
//! place so the two modes cannot drift. JSON output is one object per
//! command, stable enough to be scripted against.

use std::io::{self, Write};

use serde::Serialize;

/// The two output modes supported by `cg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text.
    Human,
    /// Machine-readable JSON, one object per command.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Result of one interpreter command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Mutation applied (create / cite / remove).
    Applied { op: String, id: String },
    /// A yes/no answer (exists).
    Truth { query: String, value: bool },
    /// A single id (root, show).
    Id { query: String, id: String },
    /// An ordered id list (parents, children, ancestors, descendants, list).
    IdList { query: String, ids: Vec<String> },
    /// Non-fatal advisory attached to an applied mutation.
    Warning { message: String },
}

/// Render one outcome to `w` in the requested mode.
pub fn render(w: &mut dyn Write, mode: OutputMode, outcome: &Outcome) -> io::Result<()> {
    if mode.is_json() {
        let line = serde_json::to_string(outcome).map_err(io::Error::other)?;
        return writeln!(w, "{line}");
    }

    match outcome {
        Outcome::Applied { op, id } => writeln!(w, "ok: {op} {id}"),
        Outcome::Truth { query, value } => writeln!(w, "{query}: {value}"),
        Outcome::Id { query, id } => writeln!(w, "{query}: {id}"),
        Outcome::IdList { query, ids } => {
            if ids.is_empty() {
                writeln!(w, "{query}: (none)")
            } else {
                writeln!(w, "{query}: {}", ids.join(" "))
            }
        }
        Outcome::Warning { message } => writeln!(w, "warning: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, OutputMode, render};

    fn rendered(mode: OutputMode, outcome: &Outcome) -> String {
        let mut buf = Vec::new();
        render(&mut buf, mode, outcome).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn human_list_output() {
        let outcome = Outcome::IdList {
            query: "children".into(),
            ids: vec!["a".into(), "b".into()],
        };
        assert_eq!(rendered(OutputMode::Human, &outcome), "children: a b\n");
    }

    #[test]
    fn human_empty_list_output() {
        let outcome = Outcome::IdList {
            query: "parents".into(),
            ids: vec![],
        };
        assert_eq!(rendered(OutputMode::Human, &outcome), "parents: (none)\n");
    }

    #[test]
    fn json_output_is_one_stable_object_per_line() {
        let outcome = Outcome::Truth {
            query: "exists".into(),
            value: true,
        };
        assert_eq!(
            rendered(OutputMode::Json, &outcome),
            "{\"kind\":\"truth\",\"query\":\"exists\",\"value\":true}\n"
        );
    }
}
