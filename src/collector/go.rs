use crate::command;
use crate::error::CollectError;

/// Upper bound on ids passed to a single `go list` invocation.
const BATCH_SIZE: usize = 500;

const DEPS_TEMPLATE: &str = r#"{{join .Deps "\n"}}"#;
const NON_STANDARD_TEMPLATE: &str = "{{if not .Standard}}{{.ImportPath}}{{end}}";

/// [`BuildGraph`](super::BuildGraph) backed by `go list`.
pub struct GoList {
    program: String,
}

impl GoList {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn list(&self, template: &str, packages: &[String]) -> Result<Vec<String>, CollectError> {
        let mut args = vec!["list".to_string(), "-f".to_string(), template.to_string()];
        args.extend(packages.iter().cloned());
        let out = command::run(&self.program, &args, None)?;
        Ok(parse_lines(&out))
    }
}

impl super::BuildGraph for GoList {
    fn dependencies(&self, targets: &[String]) -> Result<Vec<String>, CollectError> {
        self.list(DEPS_TEMPLATE, targets)
    }

    fn non_standard(&self, ids: &[String]) -> Result<Vec<String>, CollectError> {
        let mut kept = Vec::new();
        for batch in ids.chunks(BATCH_SIZE) {
            kept.extend(self.list(NON_STANDARD_TEMPLATE, batch)?);
        }
        Ok(kept)
    }
}

/// Split `go list` output into ids, dropping blank lines.
fn parse_lines(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
