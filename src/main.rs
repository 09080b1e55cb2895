//! sciweb - Enrich converted DOCX markup for scientific web publishing

use std::process::ExitCode;

use clap::Parser;

use sciweb::{Conversion, ConversionEngine, HtmlEngine, NavigationStyle, Options};

#[derive(Parser)]
#[command(name = "sciweb")]
#[command(version, about = "Enrich converted DOCX markup for scientific web publishing", long_about = None)]
#[command(after_help = "EXAMPLES:
    sciweb paper.html paper.web.html                 Tooltips, heading ids, page markers
    sciweb paper.html out.html --full-document --css --navigation
    sciweb paper.html out.html --paragraph-numbers --first-page 215
    sciweb --inspect paper.html                      Show footnotes, breaks and styles")]
struct Cli {
    /// Converter output (HTML or XHTML)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Enriched HTML file
    #[arg(value_name = "OUTPUT", required_unless_present = "inspect")]
    output: Option<String>,

    /// Show what the input contains without converting
    #[arg(long)]
    inspect: bool,

    /// JSON options file; flags below override it
    #[arg(long, value_name = "FILE")]
    options: Option<String>,

    /// Additional style rules, one per line
    #[arg(long, value_name = "FILE")]
    style_map: Option<String>,

    /// Emit a full document instead of the body only
    #[arg(long)]
    full_document: bool,

    /// Embed the companion stylesheet (full documents only)
    #[arg(long)]
    css: bool,

    /// Embed the scroll-highlight script (full documents only)
    #[arg(long)]
    script: bool,

    /// Page title (full documents only)
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// Do not add ids to headings
    #[arg(long)]
    no_heading_ids: bool,

    /// Build the navigation column
    #[arg(long)]
    navigation: bool,

    /// Navigation entry style
    #[arg(long, value_name = "STYLE", value_parser = parse_nav_style)]
    nav_style: Option<NavigationStyle>,

    /// Keep footnote references as plain superscripts
    #[arg(long)]
    no_tooltips: bool,

    /// Abbreviate tooltips after this many characters (empty keeps rich text)
    #[arg(long, value_name = "N")]
    abbreviate: Option<String>,

    /// Number paragraphs and blockquotes
    #[arg(long)]
    paragraph_numbers: bool,

    /// Class that excludes a paragraph from numbering
    #[arg(long, value_name = "CLASS")]
    exclusion_class: Option<String>,

    /// Drop page breaks instead of marking them
    #[arg(long)]
    no_page_numbers: bool,

    /// Number of the first page
    #[arg(long, value_name = "N")]
    first_page: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_nav_style(s: &str) -> Result<NavigationStyle, String> {
    s.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = if cli.inspect {
        inspect(&cli.input)
    } else {
        build_options(&cli).and_then(|options| {
            let output = cli.output.as_deref().ok_or("output required")?;
            convert(&cli.input, output, &options, cli.quiet)
        })
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn build_options(cli: &Cli) -> Result<Options, String> {
    let mut options = match &cli.options {
        Some(path) => Options::load(path).map_err(|e| format!("{path}: {e}"))?,
        None => Options::default(),
    };

    if let Some(path) = &cli.style_map {
        let rules = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        if !options.style_map.is_empty() {
            options.style_map.push('\n');
        }
        options.style_map.push_str(&rules);
    }

    if cli.full_document {
        options.body_only = false;
    }
    if cli.css {
        options.insert_css = true;
    }
    if cli.script {
        options.insert_script = true;
    }
    if let Some(title) = &cli.title {
        options.page_title = Some(title.clone());
    }
    if cli.no_heading_ids {
        options.heading_ids = false;
    }
    if cli.navigation {
        options.navigation = true;
    }
    if let Some(style) = cli.nav_style {
        options.navigation_style = style;
    }
    if cli.no_tooltips {
        options.tooltips = false;
    }
    if let Some(n) = &cli.abbreviate {
        options.abbreviate_tooltips = n.clone();
    }
    if cli.paragraph_numbers {
        options.paragraph_numbers = true;
    }
    if let Some(class) = &cli.exclusion_class {
        options.paragraph_exclusion_class = class.clone();
    }
    if cli.no_page_numbers {
        options.page_numbers = false;
    }
    if let Some(n) = &cli.first_page {
        options.first_page = n.clone();
    }

    Ok(options)
}

fn inspect(path: &str) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    let conversion: Conversion = HtmlEngine.convert(&bytes).map_err(|e| e.to_string())?;

    println!("File: {path}");
    println!("Reader: {:?}", conversion.mode);
    println!("Footnotes: {}", conversion.footnotes.len());
    println!("Page breaks: {}", conversion.page_breaks.len());
    if conversion.detected_styles.is_empty() {
        println!("Custom styles: none");
    } else {
        println!("Custom styles:");
        for style in &conversion.detected_styles {
            println!("  {style}");
        }
    }

    Ok(())
}

fn convert(input: &str, output: &str, options: &Options, quiet: bool) -> Result<(), String> {
    let summary = sciweb::convert_file(input, output, options).map_err(|e| e.to_string())?;

    if !quiet {
        println!("{input} -> {output}");
        println!(
            "  {} heading ids, {} tooltips, {} page markers, {} numbered paragraphs",
            summary.heading_ids, summary.tooltips, summary.page_markers, summary.numbered_paragraphs
        );
        if summary.skipped_rules > 0 {
            println!("  {} style rules skipped (see warnings)", summary.skipped_rules);
        }
    }

    Ok(())
}
