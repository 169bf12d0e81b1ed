use crate::output_utils;
use crate::server_version::ServerVersion;
use crate::CommandResult;
use crate::RunnableCommand;
use anyhow::Context;
use libgraphql_compat::BindingValue;
use libgraphql_compat::QueryCompatTransformer;
use libgraphql_compat::VariableBindings;
use libgraphql_compat::file_reader;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, clap::Args)]
pub(crate) struct RewriteCmd {
    #[arg(
        help="Path to a JSON file containing an object that maps variable \
             names to the values bound to them.",
        long,
        value_name="FILE",
    )]
    bindings: Option<PathBuf>,

    #[arg(
        default_values_t=[
            "graphql".to_string(),
            "gql".to_string(),
        ],
        help="Set of file extensions to filter to when searching for files \
             within a directory.",
        long,
        value_delimiter = ',',
    )]
    graphql_file_exts: Vec<String>,

    #[arg(
        help="The version of the server the rewritten documents will be sent \
             to (e.g. `24.03.1`).",
        long,
        required=true,
    )]
    server_version: ServerVersion,

    #[arg(
        help="Bind a single variable. VALUE is parsed as JSON, falling back \
             to a plain string. Overrides values from --bindings.",
        long="var",
        value_name="NAME=VALUE",
        value_parser=parse_var_binding,
    )]
    vars: Vec<(String, BindingValue)>,

    #[arg(
        help="Paths to one or more GraphQL files or directories containing \
             GraphQL files which need to be rewritten.",
        name="FILE_OR_DIR_PATHS",
        required=true,
    )]
    file_or_dir_paths: Vec<PathBuf>,
}

fn parse_var_binding(arg: &str) -> Result<(String, BindingValue), String> {
    let Some((name, raw_value)) = arg.split_once('=') else {
        return Err(format!("Expected `NAME=VALUE`, found `{arg}`"));
    };
    let name = name.trim().trim_start_matches('$');
    if name.is_empty() {
        return Err(format!("Missing variable name in `{arg}`"));
    }

    let value =
        serde_json::from_str::<BindingValue>(raw_value)
            .unwrap_or_else(|_| BindingValue::String(raw_value.to_string()));
    Ok((name.to_string(), value))
}

impl RewriteCmd {
    fn load_bindings(&self) -> anyhow::Result<VariableBindings> {
        let mut bindings = match &self.bindings {
            Some(path) => {
                let content = file_reader::read_content(path)?;
                serde_json::from_str::<VariableBindings>(&content)
                    .with_context(|| format!("Failed to load bindings from {path:#?}"))?
            },
            None => VariableBindings::new(),
        };

        if !self.vars.is_empty() {
            log::debug!("Applying {} --var bindings over the bindings file.", self.vars.len());
            bindings.merge(self.vars.iter().cloned().collect());
        }

        log::debug!("Loaded {} variable bindings.", bindings.len());
        Ok(bindings)
    }

    fn find_graphql_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        // Normalize the set of file extensions to filter with
        let graphql_file_exts: HashSet<&str> =
            self.graphql_file_exts.iter()
                .map(|ext| ext.trim_start_matches('.'))
                .collect();

        log::debug!(
            "Scanning {} input paths...",
            self.file_or_dir_paths.len(),
        );
        let mut file_paths = vec![];
        for path in &self.file_or_dir_paths {
            // A file named explicitly is rewritten even if its extension
            // doesn't match --graphql-file-exts.
            if path.is_file() {
                file_paths.push(path.to_owned());
                continue;
            }

            for entry in WalkDir::new(path.as_path()).follow_links(true).sort_by_file_name() {
                let entry = entry.with_context(|| format!(
                    "Encountered an error while iterating recursive filesystem \
                    entities at/under {path:#?}",
                ))?;
                let entry_path = entry.path();
                if !entry.file_type().is_file() {
                    log::trace!("Skipping non-file: {entry_path:#?}.");
                    continue;
                }

                if has_graphql_ext(entry_path, &graphql_file_exts) {
                    log::trace!("Found GraphQL file at {entry_path:#?}.");
                    file_paths.push(entry_path.to_path_buf());
                } else {
                    log::trace!("Skipping non-graphql file: {entry_path:#?}.");
                }
            }
        }

        log::debug!("Found {} GraphQL files to be rewritten.", file_paths.len());
        Ok(file_paths)
    }
}

fn has_graphql_ext(path: &Path, graphql_file_exts: &HashSet<&str>) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .is_some_and(|ext| graphql_file_exts.contains(ext.as_ref()))
}

#[inherent::inherent]
impl RunnableCommand for RewriteCmd {
    pub async fn run(self) -> CommandResult {
        let bindings = match self.load_bindings() {
            Ok(bindings) => bindings,
            Err(e) => return CommandResult::failure(format_args!(
                "Failed to load variable bindings: {e:#}",
            )),
        };

        let file_paths = match self.find_graphql_files() {
            Ok(file_paths) => file_paths,
            Err(e) => return CommandResult::failure(format_args!("{e:#}")),
        };

        let transformer = QueryCompatTransformer::new(&bindings, &self.server_version);
        let mut outputs = vec![];
        let mut errors = vec![];
        for path in &file_paths {
            match transformer.transform_file(path) {
                Ok(output) => outputs.push((path, output)),
                Err(e) => errors.push(format!("  * {}: {e}", path.display())),
            }
        }

        if !errors.is_empty() {
            return CommandResult::failure(format_args!(
                "Failed to rewrite {} of {} GraphQL files for server version `{}`:\n{}",
                errors.len(),
                file_paths.len(),
                self.server_version,
                errors.join("\n"),
            ));
        }

        log::info!(
            "{} Rewrote {} GraphQL files for server version `{}`.",
            output_utils::GREEN_CHECK,
            outputs.len(),
            self.server_version,
        );

        let stdout = match outputs.as_slice() {
            [(_, output)] => output.trim_end().to_string(),
            outputs => outputs.iter()
                .map(|(path, output)| format!("# {}\n{}", path.display(), output.trim_end()))
                .collect::<Vec<_>>()
                .join("\n\n"),
        };
        CommandResult::Output(stdout)
    }
}
