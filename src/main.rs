// SPDX-License-Identifier: MPL-2.0
use page_l10n::config;
use page_l10n::infrastructure::{FilePreferenceStore, MarkupDocument};
use page_l10n::{paths, Locale, Localizer, TranslationTable};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const HELP: &str = "\
page-l10n - localize annotated page markup

USAGE:
  page-l10n [OPTIONS] [INPUT] [OUTPUT]

ARGS:
  INPUT     Markup file to localize (stdin when absent or \"-\")
  OUTPUT    Destination file (stdout when absent)

OPTIONS:
  --lang CODE          Switch to and persist this language (es, en)
  --translate KEY      Print the translation of KEY and exit
  --config-dir DIR     Directory holding settings.toml
  --data-dir DIR       Directory holding the persisted preference
  -h, --help           Print this help
";

struct Flags {
    lang: Option<String>,
    translate: Option<String>,
    config_dir: Option<String>,
    data_dir: Option<String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn parse_flags() -> Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let lang = args.opt_value_from_str("--lang")?;
    let translate = args.opt_value_from_str("--translate")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let data_dir = args.opt_value_from_str("--data-dir")?;

    let mut free = args.finish().into_iter().map(PathBuf::from);
    let input = free.next().filter(|path| path.as_os_str() != "-");
    let output = free.next();

    Ok(Some(Flags {
        lang,
        translate,
        config_dir,
        data_dir,
        input,
        output,
    }))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            eprintln!("error: {error}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    if let Some(code) = &flags.lang {
        if Locale::from_code(code).is_none() {
            eprintln!("error: unsupported language {code:?} (expected one of: es, en)");
            return ExitCode::from(2);
        }
    }

    match run(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(flags: Flags) -> page_l10n::error::Result<()> {
    paths::init_cli_overrides(flags.data_dir, flags.config_dir);

    let (config, warning) = config::load();
    if let Some(key) = warning {
        tracing::warn!("{key}: using default configuration");
    }
    let (mut store, warning) = FilePreferenceStore::open();
    if let Some(key) = warning {
        tracing::warn!("{key}: starting without a stored language");
    }

    let table = TranslationTable::embedded();

    if let Some(key) = flags.translate {
        let environment = page_l10n::i18n::detect_environment_locale();
        let localizer = Localizer::restore(table, &config, &store, environment.as_deref());
        let locale = flags
            .lang
            .as_deref()
            .and_then(Locale::from_code)
            .unwrap_or(localizer.current_locale());
        println!("{}", localizer.table().translate(locale, &key));
        return Ok(());
    }

    let source = match &flags.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let mut document = MarkupDocument::parse(&source)?;

    let mut localizer = Localizer::initialize(table, &config, &store, &mut document);
    if let Some(code) = &flags.lang {
        localizer.set_language_code(code, &mut store, &mut document);
    }

    match &flags.output {
        Some(path) => document.save(path)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(document.to_markup()?.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
