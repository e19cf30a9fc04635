// FILE: src/cli/handlers.rs
use crate::{
    cli::OutputFormat, rename_file, scan_stylesheet, RenameError, RenameStats, Renamer,
    RenamingMap, Result, Stylesheet,
};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Instant;
use walkdir::WalkDir;

const RENAMED_SUFFIX: &str = "renamed.json";
const MAP_SUFFIX: &str = "map.json";

// --- RENAME ---
pub fn handle_rename_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = matches
        .get_one::<String>("input")
        .ok_or_else(|| RenameError::invalid_format("Missing input path"))?;
    let output_path = matches
        .get_one::<String>("output")
        .cloned()
        .or_else(|| cli.config.output_directory.clone());
    let map_path = matches
        .get_one::<String>("map")
        .cloned()
        .or_else(|| cli.config.map_file.clone());

    // Fail on bad options before touching any file
    cli.build_rename_options(matches)?;

    let input = Path::new(input_path);
    let rename_start = Instant::now();
    let total = if input.is_dir() {
        if !matches.get_flag("recursive") {
            return Err(RenameError::invalid_format(format!(
                "{} is a directory, use --recursive",
                input_path
            )));
        }
        rename_directory(cli, matches, input, output_path.as_deref(), map_path.as_deref())?
    } else {
        let output = output_path
            .map(PathBuf::from)
            .unwrap_or_else(|| sibling_path(input, RENAMED_SUFFIX));
        rename_single_file(cli, matches, input, &output, map_path.as_deref().map(Path::new))?
    };

    println!("✅ Rename successful!");
    println!("   Time: {}ms", rename_start.elapsed().as_millis());
    if matches.get_flag("stats") {
        let format = matches.get_one::<OutputFormat>("format").unwrap_or(&OutputFormat::Text);
        print_detailed_stats(&total, format)?;
    }
    log::debug!("Total CLI time: {}ms", cli.elapsed_ms());

    Ok(())
}

fn rename_single_file(
    cli: &super::EnhancedCli,
    matches: &clap::ArgMatches,
    input: &Path,
    output: &Path,
    map_path: Option<&Path>,
) -> Result<RenameStats> {
    println!("🔨 Renaming {} -> {}", input.display(), output.display());

    let (tx, rx) = channel::<RenamingMap>();
    let options = cli.build_rename_options(matches)?.on_output_map(move |map| {
        let _ = tx.send(map.clone());
    });
    let mut renamer = Renamer::new(options);

    let stats = rename_file(&path_str(input)?, &path_str(output)?, &mut renamer)?;
    let map = rx.try_recv().map_err(|_| RenameError::invalid_format("Renaming map was not delivered"))?;

    println!("   Custom properties: {} ({} excluded)", map.len(), stats.names_excluded);

    if let Some(map_path) = map_path {
        if let Some(parent) = map_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(map_path, map.to_json()?)?;
        println!("   Map: {}", map_path.display());
    }

    Ok(stats)
}

fn rename_directory(
    cli: &super::EnhancedCli,
    matches: &clap::ArgMatches,
    input_dir: &Path,
    output_dir: Option<&str>,
    map_dir: Option<&str>,
) -> Result<RenameStats> {
    let files = collect_stylesheets(input_dir);
    if files.is_empty() {
        log::warn!("No stylesheet JSON files found under {}", input_dir.display());
    }

    let mut total = RenameStats::default();
    for file in files {
        let relative = file.strip_prefix(input_dir).unwrap_or(file.as_path());

        let output = match output_dir {
            Some(dir) => {
                let target = Path::new(dir).join(relative);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                target
            }
            None => sibling_path(&file, RENAMED_SUFFIX),
        };
        let map_path = map_dir.map(|dir| sibling_path(&Path::new(dir).join(relative), MAP_SUFFIX));

        let stats = rename_single_file(cli, matches, &file, &output, map_path.as_deref())?;
        accumulate(&mut total, &stats);
    }

    Ok(total)
}

/// Stylesheet JSON files under `dir`, skipping this tool's own outputs
fn collect_stylesheets(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            name.ends_with(".json")
                && !name.ends_with(&format!(".{}", RENAMED_SUFFIX))
                && !name.ends_with(&format!(".{}", MAP_SUFFIX))
        })
        .collect();
    files.sort();
    files
}

/// `dir/theme.json` + `renamed.json` -> `dir/theme.renamed.json`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.{}", stem, suffix))
}

fn path_str(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| RenameError::invalid_format(format!("Non UTF-8 path: {}", path.display())))
}

fn accumulate(total: &mut RenameStats, stats: &RenameStats) {
    total.rules_visited += stats.rules_visited;
    total.declarations_visited += stats.declarations_visited;
    total.properties_renamed += stats.properties_renamed;
    total.values_rewritten += stats.values_rewritten;
    total.names_discovered += stats.names_discovered;
    total.names_excluded += stats.names_excluded;
    total.unterminated_values += stats.unterminated_values;
}

fn stats_json(stats: &RenameStats) -> Result<String> {
    serde_json::to_string_pretty(stats)
        .map_err(|e| RenameError::invalid_format(format!("Cannot serialize statistics: {}", e)))
}

fn print_detailed_stats(stats: &RenameStats, format: &OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", stats_json(stats)?);
        return Ok(());
    }

    println!("\n📊 Detailed Statistics:");
    println!("   Rules: {}", stats.rules_visited);
    println!("   Declarations: {}", stats.declarations_visited);
    println!("   Names discovered: {}", stats.names_discovered);
    println!("   Names excluded: {}", stats.names_excluded);
    println!("   Properties renamed: {}", stats.properties_renamed);
    println!("   Values rewritten: {}", stats.values_rewritten);
    if stats.unterminated_values > 0 {
        println!("   ⚠️  Unterminated var() values: {}", stats.unterminated_values);
    }
    Ok(())
}

// --- SCAN ---
pub fn handle_scan_command(matches: &clap::ArgMatches) -> Result<()> {
    let input_path = matches
        .get_one::<String>("input")
        .ok_or_else(|| RenameError::invalid_format("Missing input path"))?;
    let source = fs::read_to_string(input_path).map_err(|e| RenameError::FileNotFound {
        path: format!("{}: {}", input_path, e),
    })?;
    let stylesheet = Stylesheet::from_json(&source)?;
    let report = scan_stylesheet(&stylesheet);

    match matches.get_one::<OutputFormat>("format").unwrap_or(&OutputFormat::Text) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| RenameError::invalid_format(format!("Cannot serialize report: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("🔍 {} ({} declarations)", input_path, stylesheet.declaration_count());
            for entry in &report {
                println!("  [{}] {} {}", entry.rule_index, entry.selector, entry.prop);
                if let Some(name) = &entry.declares {
                    println!("      declares --{}", name);
                }
                for usage in &entry.usages {
                    let default = if usage.has_default { " (with default)" } else { "" };
                    println!("      uses --{} at {}..{}{}", usage.name, usage.start, usage.end, default);
                }
                if let Some(offset) = entry.unterminated_at {
                    println!("      ⚠️  unterminated var( at {}", offset);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EnhancedCli;

    const SHEET: &str = r#"{"rules":[{"selector":":root","declarations":[{"prop":"--gap","value":"4px"},{"prop":"margin","value":"var(--gap) var(--keep)"}]}]}"#;

    fn matches_for(cli: &EnhancedCli, args: &[&str]) -> clap::ArgMatches {
        let matches = cli.build_cli().try_get_matches_from(args).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        sub.clone()
    }

    #[test]
    fn test_rename_single_file_with_map() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("theme.json");
        let map = dir.path().join("maps/theme-map.json");
        fs::write(&input, SHEET).unwrap();

        let cli = EnhancedCli::new();
        let input_str = input.to_str().unwrap();
        let map_str = map.to_str().unwrap();
        let matches = matches_for(
            &cli,
            &["cssvr", "rename", input_str, "-s", "debug", "--except", "keep", "-m", map_str],
        );

        handle_rename_command(&cli, &matches).unwrap();

        let output = fs::read_to_string(dir.path().join("theme.renamed.json")).unwrap();
        let sheet = Stylesheet::from_json(&output).unwrap();
        assert_eq!(sheet.rules[0].declarations[0].prop, "--gap_");
        assert_eq!(sheet.rules[0].declarations[1].value, "var(--gap_) var(--keep)");

        let map_json = fs::read_to_string(&map).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&map_json).unwrap(),
            serde_json::json!({ "gap": "gap_" })
        );
    }

    #[test]
    fn test_directory_requires_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let cli = EnhancedCli::new();
        let matches = matches_for(&cli, &["cssvr", "rename", dir.path().to_str().unwrap()]);

        assert!(handle_rename_command(&cli, &matches).is_err());
    }

    #[test]
    fn test_rename_directory_independent_runs() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("in");
        let out_dir = dir.path().join("out");
        let map_dir = dir.path().join("maps");
        fs::create_dir_all(input_dir.join("nested")).unwrap();
        fs::write(input_dir.join("a.json"), SHEET).unwrap();
        fs::write(
            input_dir.join("nested/b.json"),
            r#"{"rules":[{"selector":"b","declarations":[{"prop":"color","value":"var(--other)"}]}]}"#,
        )
        .unwrap();

        let cli = EnhancedCli::new();
        let matches = matches_for(
            &cli,
            &[
                "cssvr",
                "rename",
                input_dir.to_str().unwrap(),
                "-r",
                "--prefix",
                "x",
                "-o",
                out_dir.to_str().unwrap(),
                "-m",
                map_dir.to_str().unwrap(),
            ],
        );

        handle_rename_command(&cli, &matches).unwrap();

        let b = Stylesheet::from_json(&fs::read_to_string(out_dir.join("nested/b.json")).unwrap()).unwrap();
        assert_eq!(b.rules[0].declarations[0].value, "var(--x-other)");

        let b_map = fs::read_to_string(map_dir.join("nested/b.map.json")).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&b_map).unwrap(),
            serde_json::json!({ "other": "x-other" })
        );
        assert!(map_dir.join("a.map.json").exists());
    }

    #[test]
    fn test_collect_skips_outputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), SHEET).unwrap();
        fs::write(dir.path().join("a.renamed.json"), SHEET).unwrap();
        fs::write(dir.path().join("a.map.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = collect_stylesheets(dir.path());
        assert_eq!(files, vec![dir.path().join("a.json")]);
    }

    #[test]
    fn test_stats_json() {
        let stats = RenameStats {
            declarations_visited: 3,
            names_discovered: 2,
            ..Default::default()
        };

        let value: serde_json::Value = serde_json::from_str(&stats_json(&stats).unwrap()).unwrap();
        assert_eq!(value["declarations_visited"], 3);
        assert_eq!(value["names_discovered"], 2);
        assert_eq!(value["values_rewritten"], 0);
    }

    #[test]
    fn test_rename_with_json_stats() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("theme.json");
        fs::write(&input, SHEET).unwrap();

        let cli = EnhancedCli::new();
        let matches = matches_for(
            &cli,
            &["cssvr", "rename", input.to_str().unwrap(), "--stats", "-f", "json"],
        );

        handle_rename_command(&cli, &matches).unwrap();
        assert!(dir.path().join("theme.renamed.json").exists());
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("dir/theme.json"), RENAMED_SUFFIX),
            PathBuf::from("dir/theme.renamed.json")
        );
    }

    #[test]
    fn test_scan_command() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("theme.json");
        fs::write(&input, SHEET).unwrap();

        let cli = EnhancedCli::new();
        let matches = matches_for(&cli, &["cssvr", "scan", input.to_str().unwrap(), "-f", "json"]);
        handle_scan_command(&matches).unwrap();

        // scanning never writes anything
        assert_eq!(fs::read_to_string(&input).unwrap(), SHEET);
    }
}
