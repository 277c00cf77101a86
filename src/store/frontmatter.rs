use std::path::Path;

use crate::model::SKILL_FILE;

/// Title to give a copied markdown file: the skill directory name for
/// `SKILL.md`, the file stem for other markdown files.
pub fn title_for(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if file_name == SKILL_FILE {
        return path.parent()?.file_name()?.to_str().map(str::to_string);
    }
    if path.extension().is_some_and(|ext| ext == "md") {
        return path.file_stem()?.to_str().map(str::to_string);
    }
    None
}

/// Add a `title` key to the leading front-matter block, creating the block if
/// there is none. Content that already has a title is returned unchanged.
pub fn ensure_title(content: &str, title: &str) -> String {
    let title = yaml_scalar(title);

    for newline in ["\n", "\r\n"] {
        let Some(body) = content.strip_prefix("---").and_then(|rest| rest.strip_prefix(newline))
        else {
            continue;
        };
        if let Some(block) = front_matter_block(body) {
            if block.lines().any(|line| line.trim_start().starts_with("title:")) {
                return content.to_string();
            }
            return format!("---{newline}title: {title}{newline}{body}");
        }
    }

    format!("---\ntitle: {title}\n---\n\n{content}")
}

/// The front-matter lines before the closing `---`, if it is closed.
fn front_matter_block(body: &str) -> Option<&str> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(&body[..offset]);
        }
        offset += line.len();
    }
    None
}

fn yaml_scalar(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.contains([':', '#', '"', '\'', '[', ']', '{', '}'])
        || value.starts_with(['-', '?', '!', '&', '*', '|', '>', '%', '@', '`', ' ']);
    if needs_quotes {
        serde_json::Value::String(value.to_string()).to_string()
    } else {
        value.to_string()
    }
}
