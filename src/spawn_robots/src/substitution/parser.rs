//! Substitution parser

use crate::{
    error::{LaunchError, Result},
    substitution::types::Substitution,
};
use lru::LruCache;
use std::{cell::RefCell, num::NonZeroUsize};

// Caches parsed substitution lists, never resolved values: the same input
// always parses to the same list, and resolution happens later against a
// context. Descriptor fields repeat a lot across robot groups.
const SUBSTITUTION_CACHE_SIZE: usize = 256;

thread_local! {
    static PARSE_CACHE: RefCell<LruCache<String, Vec<Substitution>>> = RefCell::new(
        LruCache::new(NonZeroUsize::new(SUBSTITUTION_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN)),
    );
}

/// Parse substitution string like "$(var x)" or "text $(env Y) more"
/// Supports nested substitutions like "$(var $(env NAME)_type)"
pub fn parse_substitutions(input: &str) -> Result<Vec<Substitution>> {
    let cached = PARSE_CACHE.with(|cache| cache.borrow_mut().get(input).cloned());
    if let Some(cached) = cached {
        log::trace!("Substitution parse cache hit: {}", input);
        return Ok(cached);
    }

    log::trace!("Substitution parse cache miss: {}", input);
    let result = parse_substitutions_recursive(input)?;

    PARSE_CACHE.with(|cache| {
        cache.borrow_mut().put(input.to_string(), result.clone());
    });

    Ok(result)
}

/// Internal recursive parser that handles nested substitutions
fn parse_substitutions_recursive(input: &str) -> Result<Vec<Substitution>> {
    let mut result = Vec::new();
    let mut chars = input.char_indices().peekable();
    let mut last_pos = 0;

    while let Some((i, ch)) = chars.next() {
        if ch != '$' || !matches!(chars.peek(), Some((_, '('))) {
            continue;
        }

        if i > last_pos {
            result.push(Substitution::Text(input[last_pos..i].to_string()));
        }

        // Skip the '('
        chars.next();

        // Find matching ')' by counting parentheses
        let sub_start = i + 2;
        let mut depth = 1;
        let mut sub_end = sub_start;

        for (pos, c) in chars.by_ref() {
            if c == '(' {
                depth += 1;
            } else if c == ')' {
                depth -= 1;
                if depth == 0 {
                    sub_end = pos;
                    break;
                }
            }
        }

        if depth != 0 {
            return Err(LaunchError::InvalidSubstitution(format!(
                "Unmatched parentheses in '{}'",
                input
            )));
        }

        result.push(parse_substitution_content(&input[sub_start..sub_end])?);
        last_pos = sub_end + 1;
    }

    if last_pos < input.len() {
        result.push(Substitution::Text(input[last_pos..].to_string()));
    }

    // If no substitutions found, treat entire input as text
    if result.is_empty() {
        result.push(Substitution::Text(input.to_string()));
    }

    Ok(result)
}

/// Parse the content inside a substitution $(...)
fn parse_substitution_content(content: &str) -> Result<Substitution> {
    let trimmed = content.trim();
    let (sub_type, args) = match trimmed.split_once(' ') {
        Some((sub_type, args)) => (sub_type, Some(args.trim())),
        None => (trimmed, None),
    };

    if sub_type.is_empty() {
        return Err(LaunchError::InvalidSubstitution(
            "Empty substitution".to_string(),
        ));
    }

    let require_args = || {
        args.filter(|a| !a.is_empty()).ok_or_else(|| {
            LaunchError::InvalidSubstitution(format!("{} requires an argument", sub_type))
        })
    };

    match sub_type {
        "var" => Ok(Substitution::LaunchConfiguration(
            parse_substitutions_recursive(require_args()?)?,
        )),
        "env" => {
            let (name, default) = split_env_args(require_args()?);
            Ok(Substitution::EnvironmentVariable {
                name: parse_substitutions_recursive(name)?,
                default: default.map(parse_substitutions_recursive).transpose()?,
            })
        }
        "find-pkg-share" => Ok(Substitution::FindPackageShare(
            parse_substitutions_recursive(require_args()?)?,
        )),
        "command" => Ok(Substitution::Command(parse_substitutions_recursive(
            strip_quotes(require_args()?),
        )?)),
        other => Err(LaunchError::InvalidSubstitution(format!(
            "Unknown substitution type: {}",
            other
        ))),
    }
}

/// Split "NAME default" into name and default, keeping a nested
/// substitution in the name intact.
fn split_env_args(args: &str) -> (&str, Option<&str>) {
    let mut depth = 0;
    for (i, ch) in args.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c.is_whitespace() && depth == 0 => {
                let default = args[i..].trim();
                return (&args[..i], (!default.is_empty()).then_some(default));
            }
            _ => {}
        }
    }
    (args, None)
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = s
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    s
}
