//! The convert command
//!
//! Resolves inputs, formats and the output target from flags layered over the config file,
//! runs the conversion and writes the result. Nothing touches the disk until every output
//! buffer has been computed.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use quiz_babel::formats::{MxmlFormat, MxmlOptions};
use quiz_babel::{
    split_outputs, Conversion, ConvertOptions, FormatRegistry, QuestionSet, QuizFormat,
    SerializedQuiz,
};
use quiz_config::{Loader, QuizConfig, LOCAL_CONFIG_FILE};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Separator used when concatenating several Markdown inputs
const MD_INPUT_SEPARATOR: &str = "\n\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Dir(PathBuf),
}

/// Everything a run needs, after flags and config have been merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertPlan {
    pub input_files: Vec<PathBuf>,
    pub input_dirs: Vec<PathBuf>,
    pub from: QuizFormat,
    pub to: QuizFormat,
    pub output: OutputTarget,
    pub category: Option<String>,
}

/// A file ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub contents: String,
}

pub fn handle_convert_command(
    matches: &ArgMatches,
    extra_params: HashMap<String, String>,
) -> Result<()> {
    let config = load_cli_config(matches)?;
    let plan = build_plan(matches, &config)?;
    let conversion = Conversion::new(plan.from, plan.to)?;

    let mut registry = FormatRegistry::default();
    let mxml_options =
        MxmlOptions::try_from(&config.mxml).context("Invalid [mxml] configuration")?;
    registry.register(MxmlFormat::new(mxml_options));

    let inputs = gather_inputs(&plan, &registry)?;
    tracing::info!("Converting from {} to {}", plan.from, plan.to);
    tracing::info!(inputs = ?inputs, output = ?plan.output, "paths");

    let set = decode_inputs(&conversion, &registry, &inputs)?;
    let options = ConvertOptions {
        category: plan.category.clone(),
        extra: extra_params,
    };
    let serialized = conversion.encode(&registry, &set, &options)?;
    let writes = plan_writes(&plan.output, &set, serialized)?;

    let created_dir = match &plan.output {
        OutputTarget::Dir(dir) if !dir.exists() => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Error creating directory '{}'", dir.display()))?;
            Some(dir)
        }
        _ => None,
    };
    if let Err(err) = commit_writes(&writes) {
        if let Some(dir) = created_dir {
            if let Err(cleanup) = fs::remove_dir(dir) {
                tracing::warn!(dir = %dir.display(), %cleanup, "could not remove output directory");
            }
        }
        return Err(err);
    }
    tracing::info!(files = writes.len(), "conversion written");
    Ok(())
}

/// Stage every file as a temporary file next to its destination, then move them into place.
/// If a move fails, files this run created are removed again and unmoved temporaries are
/// dropped with their handles.
fn commit_writes(writes: &[PendingWrite]) -> Result<()> {
    let mut staged = Vec::with_capacity(writes.len());
    for write in writes {
        let dir = match write.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("Error staging file in '{}'", dir.display()))?;
        file.write_all(write.contents.as_bytes())
            .with_context(|| format!("Error writing file '{}'", write.path.display()))?;
        staged.push((file, write.path.as_path()));
    }

    let mut created: Vec<&Path> = Vec::new();
    for (file, path) in staged {
        let existed = path.exists();
        if let Err(err) = file.persist(path) {
            for done in &created {
                if let Err(cleanup) = fs::remove_file(done) {
                    tracing::warn!(path = %done.display(), %cleanup, "could not remove output file");
                }
            }
            return Err(anyhow::Error::new(err.error)
                .context(format!("Error writing file '{}'", path.display())));
        }
        if !existed {
            created.push(path);
        }
    }
    Ok(())
}

/// Embedded defaults, then `quiz.toml` in the working directory, then `--config`, then the
/// scalar flags given on the command line.
fn load_cli_config(matches: &ArgMatches) -> Result<QuizConfig> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    for (flag, key) in [
        ("output-file", "convert.output_file"),
        ("output-path", "convert.output_dir"),
        ("category", "convert.category"),
    ] {
        if let Some(value) = matches.get_one::<String>(flag) {
            loader = loader.set_override(key, value.as_str())?;
        }
    }
    for (flag, key) in [("from", "convert.input_format"), ("to", "convert.output_format")] {
        if let Some(format) = matches.get_one::<QuizFormat>(flag) {
            loader = loader.set_override(key, format.tag())?;
        }
    }

    loader.build().context("Failed to load configuration")
}

fn cli_list(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Merge flags with config and resolve both formats. Errors here are usage errors.
pub fn build_plan(matches: &ArgMatches, config: &QuizConfig) -> Result<ConvertPlan> {
    let mut files = cli_list(matches, "inputs");
    files.extend(cli_list(matches, "input-file"));
    files.extend(config.convert.input_files.iter().cloned());

    let mut dirs = cli_list(matches, "input-path");
    dirs.extend(config.convert.input_dirs.iter().cloned());

    resolve_plan(
        files.into_iter().map(PathBuf::from).collect(),
        dirs.into_iter().map(PathBuf::from).collect(),
        config,
    )
}

fn resolve_plan(
    input_files: Vec<PathBuf>,
    input_dirs: Vec<PathBuf>,
    config: &QuizConfig,
) -> Result<ConvertPlan> {
    let convert = &config.convert;

    if input_files.is_empty() && input_dirs.is_empty() {
        bail!("One of --input-path or --input-file must be set.");
    }

    let output = match (&convert.output_dir, &convert.output_file) {
        (Some(dir), _) => OutputTarget::Dir(PathBuf::from(dir)),
        (None, Some(file)) => OutputTarget::File(PathBuf::from(file)),
        (None, None) => bail!("One of --output-path or --output-file must be set."),
    };

    let from = match convert.input_format {
        Some(format) => format,
        None => infer_input_format(&input_files)?,
    };

    let to = match (convert.output_format, &output) {
        (Some(format), _) => format,
        (None, OutputTarget::Dir(_)) => {
            bail!("--output-format must be specified if using --output-path")
        }
        (None, OutputTarget::File(path)) => QuizFormat::from_path(path).with_context(|| {
            format!(
                "Output format can't be inferred from the extension of '{}'. \
                 Use --output-format to specify the output format.",
                path.display()
            )
        })?,
    };

    if matches!(output, OutputTarget::Dir(_)) && to != QuizFormat::Md {
        bail!("--output-path is only supported for MD output, not {to}");
    }

    Ok(ConvertPlan {
        input_files,
        input_dirs,
        from,
        to,
        output,
        category: convert.category.clone(),
    })
}

/// Every input file must carry the same recognised extension.
fn infer_input_format(files: &[PathBuf]) -> Result<QuizFormat> {
    if files.is_empty() {
        bail!("--input-format must be specified if using --input-path");
    }
    let detected: BTreeSet<Option<QuizFormat>> =
        files.iter().map(QuizFormat::from_path).collect();
    match detected.into_iter().collect::<Vec<_>>().as_slice() {
        [Some(format)] => Ok(*format),
        _ => bail!(
            "Input format can't be inferred from the input file extension. \
             Use --input-format to specify the input format."
        ),
    }
}

/// Absolute, de-duplicated and sorted list of files to read. Directories contribute every
/// regular file whose extension belongs to the input format.
pub fn gather_inputs(plan: &ConvertPlan, registry: &FormatRegistry) -> Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir().context("Cannot determine the working directory")?;
    let absolute = |path: &Path| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        }
    };

    let mut inputs: BTreeSet<PathBuf> = plan.input_files.iter().map(|p| absolute(p)).collect();

    let extensions = registry.get(plan.from)?.file_extensions();
    for dir in &plan.input_dirs {
        let dir = absolute(dir);
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Error reading directory '{}'", dir.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("Error reading directory '{}'", dir.display()))?
                .path();
            let matches_format = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)));
            if matches_format && path.is_file() {
                inputs.insert(path);
            }
        }
    }

    Ok(inputs.into_iter().collect())
}

/// Markdown inputs are concatenated into one document. JSON and XML files are complete
/// documents of their own, so each is decoded separately and the sets are merged in order.
fn decode_inputs(
    conversion: &Conversion,
    registry: &FormatRegistry,
    inputs: &[PathBuf],
) -> Result<QuestionSet> {
    if inputs.is_empty() {
        bail!("No input files found for format {}", conversion.from());
    }

    let mut sources = Vec::with_capacity(inputs.len());
    for path in inputs {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Error reading file '{}'", path.display()))?;
        sources.push((path, source));
    }

    if conversion.from() == QuizFormat::Md {
        let joined: Vec<&str> = sources.iter().map(|(_, source)| source.as_str()).collect();
        let joined = joined.join(MD_INPUT_SEPARATOR);
        return Ok(conversion.decode(registry, joined.trim_end_matches('\n'))?);
    }

    let mut set = QuestionSet::default();
    for (path, source) in sources {
        let decoded = conversion
            .decode(registry, &source)
            .with_context(|| format!("in '{}'", path.display()))?;
        set.extend(decoded);
    }
    Ok(set)
}

/// Turn serialized output into the files to write, checking file names up front.
pub fn plan_writes(
    output: &OutputTarget,
    set: &QuestionSet,
    serialized: SerializedQuiz,
) -> Result<Vec<PendingWrite>> {
    match (output, serialized) {
        (OutputTarget::File(path), serialized) => Ok(vec![PendingWrite {
            path: path.clone(),
            contents: serialized.into_text(),
        }]),
        (OutputTarget::Dir(dir), SerializedQuiz::Blocks(blocks)) => {
            let named = split_outputs(set, blocks)?;
            Ok(named
                .into_iter()
                .map(|block| PendingWrite {
                    path: dir.join(format!("{}.md", block.stem)),
                    contents: block.text.trim_matches('\n').to_string(),
                })
                .collect())
        }
        (OutputTarget::Dir(dir), SerializedQuiz::Text(_)) => bail!(
            "Output directory '{}' needs one block per question; only MD output provides that",
            dir.display()
        ),
    }
}
