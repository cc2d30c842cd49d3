use gradex_core::error::ExtractionError;
use gradex_core::patterns::builtin;
use gradex_core::patterns::schema::ListMode;
use std::path::Path;

pub fn show() -> Result<(), ExtractionError> {
    let json = serde_json::to_string_pretty(&builtin::default_set())?;
    println!("{json}");
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), ExtractionError> {
    let set = gradex_core::patterns::load_patterns(file)?;

    println!(
        "Pattern set '{}' is valid.",
        set.name.as_deref().unwrap_or("unnamed")
    );
    if let Some(ref desc) = set.description {
        println!("  {desc}");
    }

    let overridden: Vec<&str> = [
        ("subject_code", set.subject_code.is_some()),
        ("grade_tail", set.grade_tail.is_some()),
        ("semester_marker", set.semester_marker.is_some()),
        ("footer", set.footer.is_some()),
        ("numeric_token", set.numeric_token.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, present)| present.then_some(name))
    .collect();
    if overridden.is_empty() {
        println!("  Line patterns: built-in");
    } else {
        println!("  Overrides: {}", overridden.join(", "));
    }

    if let Some(ref list) = set.boilerplate {
        let mode = match set.boilerplate_mode {
            ListMode::Extend => "added to the built-in list",
            ListMode::Replace => "replacing the built-in list",
        };
        println!("  Boilerplate: {} pattern(s), {mode}", list.len());
    }
    println!(
        "  Lookahead: {}",
        set.lookahead.unwrap_or(builtin::LOOKAHEAD)
    );

    let warnings = gradex_core::patterns::pattern_warnings(&set);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {w}");
        }
    }

    Ok(())
}
