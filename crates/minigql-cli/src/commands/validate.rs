use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use crate::output_utils;
use minigql::ast;
use minigql::bookshelf;
use minigql::bookshelf::BookshelfConfig;
use minigql::parser::GraphQLParser;
use minigql::schema::Schema;
use minigql::validation;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, clap::Args)]
pub(crate) struct ValidateCmd {
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
        help="Paths to one or more GraphQL files or directories containing \
             GraphQL files which need to be validated.",
        name="FILE_OR_DIR_PATHS",
        required=true,
    )]
    file_or_dir_paths: Vec<PathBuf>,
}

impl ValidateCmd {
    /// Every matching file at or under the given paths, plus a lone file
    /// argument whatever its extension.
    fn find_files(&self, diagnostics: &mut Vec<String>) -> (Vec<PathBuf>, usize) {
        let graphql_file_exts: HashSet<&str> =
            self.graphql_file_exts.iter()
                .map(|ext| ext.trim_start_matches('.'))
                .collect();

        log::debug!(
            "Scanning {} input paths...",
            self.file_or_dir_paths.len(),
        );
        let mut num_skipped_files: usize = 0;
        let mut file_paths = vec![];
        for path in &self.file_or_dir_paths {
            for entry in WalkDir::new(path.as_path()).follow_links(true) {
                match entry {
                    Ok(entry) => {
                        let path = entry.path();
                        if !entry.file_type().is_file() {
                            continue;
                        }
                        let matches_ext = path
                            .extension()
                            .and_then(|ext| ext.to_str())
                            .is_some_and(|ext| graphql_file_exts.contains(ext));
                        if matches_ext {
                            log::trace!("Found GraphQL file at {path:#?}.");
                            file_paths.push(path.to_path_buf());
                        } else {
                            log::trace!("Skipping non-GraphQL file: {path:#?}.");
                            num_skipped_files += 1;
                        }
                    },

                    Err(e) => {
                        log::trace!(
                            "Encountered an error while iterating recursive \
                            filesystem entities at/under {path:#?}."
                        );
                        diagnostics.push(format!("{}: {e}", path.display()));
                    },
                }
            }
        }

        // A single file argument is validated even if its extension doesn't
        // match `--graphql-file-exts`.
        if file_paths.is_empty()
            && self.file_or_dir_paths.len() == 1
            && let Some(first_arg_path) = self.file_or_dir_paths.first()
            && first_arg_path.is_file() {
            log::warn!(
                "Proceeding to validate {first_arg_path:#?} even though it \
                doesn't match any of the --graphql-file-exts ({}).",
                graphql_file_exts.iter()
                    .map(|ext| format!("`.{ext}`"))
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            file_paths.push(first_arg_path.clone());
            num_skipped_files = num_skipped_files.saturating_sub(1);
        }

        (file_paths, num_skipped_files)
    }
}

/// Parses and validates one file, returning its operation count.
pub(crate) fn validate_file(
    schema: &Schema,
    path: &Path,
    diagnostics: &mut Vec<String>,
) -> usize {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            diagnostics.push(format!("{}: {e}", path.display()));
            return 0;
        },
    };
    validate_source(schema, path, &source, diagnostics)
}

pub(crate) fn validate_source(
    schema: &Schema,
    path: &Path,
    source: &str,
    diagnostics: &mut Vec<String>,
) -> usize {
    let document = match GraphQLParser::with_file_path(source, path).parse_executable_document() {
        Ok(document) => document,
        Err(e) => {
            diagnostics.push(e.format_detailed(Some(source)));
            return 0;
        },
    };

    for error in validation::validate(&document, schema) {
        let location = error
            .locations()
            .first()
            .map(|pos| format!(":{}:{}", pos.line, pos.column))
            .unwrap_or_default();
        diagnostics.push(format!("{}{location}: {}", path.display(), error.message()));
    }

    document
        .definitions
        .iter()
        .filter(|def| matches!(def, ast::Definition::Operation(_)))
        .count()
}

#[inherent::inherent]
impl RunnableCommand for ValidateCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let schema = match bookshelf::schema(&BookshelfConfig::default()) {
            Ok(schema) => schema,
            Err(err) => return anyhow::Error::from(err).into(),
        };

        let mut diagnostics = vec![];
        let (file_paths, num_skipped_files) = self.find_files(&mut diagnostics);
        log::debug!(
            "Found {} GraphQL files to be validated.",
            file_paths.len(),
        );

        let mut num_operations = 0;
        for path in &file_paths {
            num_operations += validate_file(&schema, path, &mut diagnostics);
        }

        if !diagnostics.is_empty() {
            return CommandResult::stderr(format_args!(
                "{} {} GraphQL validation errors:\n{}",
                output_utils::RED_X,
                diagnostics.len(),
                diagnostics.join("\n"),
            ));
        }

        CommandResult::stdout(format_args!(
            concat!(
                "{} All GraphQL validated successfully:\n",
                "  * Analyzed {} files.\n",
                "  * Skipped {} non-graphql files.\n",
                "  * Validated {} operations.",
            ),
            output_utils::GREEN_CHECK,
            file_paths.len(),
            num_skipped_files,
            num_operations,
        ))
    }
}
