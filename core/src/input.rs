use std::collections::HashMap;
use anyhow::{anyhow, Result};

/// Free words become the title; `key:value` words become metadata.
#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub title: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut title_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            // "2:fri" style values are not keys
            if !key.is_empty() && !key.chars().all(|c| c.is_ascii_digit()) {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        title_parts.push(arg.as_str());
    }

    ParsedInput {
        title: title_parts.join(" "),
        metadata,
    }
}

/// Expands an abbreviated key (`pri` -> `priority`) against the known keys.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_words() {
        let args: Vec<String> = ["Lab", "report", "due:fri", "type:Exam", "Pri:h"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let parsed = parse_args(&args);
        assert_eq!(parsed.title, "Lab report");
        assert_eq!(parsed.metadata.get("due"), Some(&"fri".to_string()));
        assert_eq!(parsed.metadata.get("type"), Some(&"Exam".to_string()));
        assert_eq!(parsed.metadata.get("pri"), Some(&"h".to_string()));
    }

    #[test]
    fn test_expand_key() {
        let candidates = vec!["due", "priority", "project", "type", "subject"];

        assert_eq!(expand_key("d", &candidates).unwrap(), "due");
        assert_eq!(expand_key("pri", &candidates).unwrap(), "priority");
        assert_eq!(expand_key("s", &candidates).unwrap(), "subject");

        // priority, project
        assert!(expand_key("p", &candidates).is_err());
        assert!(expand_key("x", &candidates).is_err());
    }
}
