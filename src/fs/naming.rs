//! Filename generation from naming templates.
//!
//! A template is a `/`-separated relative path with `<token>` placeholders,
//! e.g. `<artist.name>/(<work.id>) <work.name>`. Tokens may use `.` or `_`
//! as separator (`<work_id>` equals `<work.id>`).

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::work::{Artist, Work};

/// A placeholder in a naming template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    ArtistId,
    ArtistUsername,
    ArtistName,
    WorkId,
    WorkName,
    WorkPages,
    WorkType,
    WorkDate,
    /// Zero-based page index; multi-page file names only.
    WorkPage,
}

impl FromStr for Token {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().replace('_', ".").as_str() {
            "artist.id" => Ok(Token::ArtistId),
            "artist.username" => Ok(Token::ArtistUsername),
            "artist.name" | "artist.nickname" => Ok(Token::ArtistName),
            "work.id" => Ok(Token::WorkId),
            "work.name" => Ok(Token::WorkName),
            "work.pages" => Ok(Token::WorkPages),
            "work.type" => Ok(Token::WorkType),
            "work.date" => Ok(Token::WorkDate),
            "work.page" => Ok(Token::WorkPage),
            _ => Err(format!("Unknown naming token: <{}>", s)),
        }
    }
}

/// Piece of a parsed template component.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Part<'a> {
    Literal(&'a str),
    Token(Token),
}

/// Values available while rendering.
#[derive(Debug, Clone, Copy)]
pub struct NamingContext<'a> {
    pub artist: &'a Artist,
    pub work: &'a Work,
    pub page: Option<usize>,
}

impl NamingContext<'_> {
    fn value(&self, token: Token) -> Result<String> {
        Ok(match token {
            Token::ArtistId => self.artist.id.clone(),
            Token::ArtistUsername => self.artist.username.clone(),
            Token::ArtistName => self.artist.nickname.clone(),
            Token::WorkId => self.work.id.clone(),
            Token::WorkName => self.work.name.clone(),
            Token::WorkPages => self.work.page_count.to_string(),
            Token::WorkType => self.work.work_type.to_string(),
            Token::WorkDate => self.work.created_at.format("%Y-%m-%d").to_string(),
            Token::WorkPage => self
                .page
                .ok_or_else(|| Error::ConfigValidation {
                    field: "naming".to_string(),
                    message: "<work.page> is only available for multi-page file names"
                        .to_string(),
                })?
                .to_string(),
        })
    }
}

/// Split one path component into literals and tokens.
///
/// An unmatched `<` is kept as a literal.
fn parse_component(component: &str) -> std::result::Result<Vec<Part<'_>>, String> {
    let mut parts = Vec::new();
    let mut rest = component;

    while let Some(start) = rest.find('<') {
        let Some(len) = rest[start..].find('>') else {
            break;
        };
        if start > 0 {
            parts.push(Part::Literal(&rest[..start]));
        }
        parts.push(Part::Token(rest[start + 1..start + len].parse()?));
        rest = &rest[start + len + 1..];
    }

    if !rest.is_empty() {
        parts.push(Part::Literal(rest));
    }

    Ok(parts)
}

/// Check that a template only uses known tokens.
pub fn validate_template(field: &str, template: &str, allow_page: bool) -> Result<()> {
    for component in template.split('/') {
        let parts = parse_component(component).map_err(|message| Error::ConfigValidation {
            field: field.to_string(),
            message,
        })?;

        if !allow_page && parts.contains(&Part::Token(Token::WorkPage)) {
            return Err(Error::ConfigValidation {
                field: field.to_string(),
                message: "<work.page> is only available in naming.multiple_file".to_string(),
            });
        }
    }

    Ok(())
}

/// Render a template into a relative path.
///
/// Empty components are dropped, so an empty template renders to an empty path.
pub fn render_template(template: &str, ctx: &NamingContext<'_>) -> Result<PathBuf> {
    let mut path = PathBuf::new();

    for component in template.split('/').filter(|c| !c.trim().is_empty()) {
        let parts = parse_component(component).map_err(|message| Error::ConfigValidation {
            field: "naming".to_string(),
            message,
        })?;

        let mut rendered = String::new();
        for part in parts {
            match part {
                Part::Literal(text) => rendered.push_str(text),
                Part::Token(token) => rendered.push_str(&ctx.value(token)?),
            }
        }

        path.push(sanitize_path_component(rendered.trim())?);
    }

    Ok(path)
}

/// Sanitize a rendered path component.
///
/// Titles are free text, so separators and reserved characters are replaced
/// rather than rejected. Only components that would escape the destination
/// (`.` and `..`) or are empty are errors.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    let sanitized = replace_reserved(name);
    let trimmed = sanitized.trim();

    if trimmed.is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    if trimmed == "." || trimmed == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    Ok(trimmed.to_string())
}

fn replace_reserved(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work::{Page, WorkType};
    use chrono::DateTime;

    fn artist() -> Artist {
        Artist {
            id: "4242".to_string(),
            username: "painter".to_string(),
            nickname: "Painter/Co".to_string(),
        }
    }

    fn work() -> Work {
        Work {
            id: "123".to_string(),
            name: "Sunset: Part 1".to_string(),
            created_at: DateTime::parse_from_rfc3339("2018-03-01T12:34:00+09:00").unwrap(),
            page_count: 2,
            tools: vec![],
            series: None,
            caption: None,
            tags: vec![],
            work_type: WorkType::Manga,
            pages: vec![Page::default(), Page::default()],
            thumbnail: String::new(),
        }
    }

    #[test]
    fn test_render_default_template() {
        let (artist, work) = (artist(), work());
        let ctx = NamingContext {
            artist: &artist,
            work: &work,
            page: None,
        };

        let path = render_template("<artist.name>/(<work.id>) <work.name>", &ctx).unwrap();
        assert_eq!(path, PathBuf::from("Painter_Co").join("(123) Sunset_ Part 1"));
    }

    #[test]
    fn test_render_underscore_tokens_and_page() {
        let (artist, work) = (artist(), work());
        let ctx = NamingContext {
            artist: &artist,
            work: &work,
            page: Some(3),
        };

        assert_eq!(
            render_template("<work_id>_p<work_page>", &ctx).unwrap(),
            PathBuf::from("123_p3")
        );
        assert_eq!(
            render_template("<work.date> <work.type> <artist.username>", &ctx).unwrap(),
            PathBuf::from("2018-03-01 manga painter")
        );
    }

    #[test]
    fn test_render_empty_template() {
        let (artist, work) = (artist(), work());
        let ctx = NamingContext {
            artist: &artist,
            work: &work,
            page: None,
        };
        assert_eq!(render_template("", &ctx).unwrap(), PathBuf::new());
    }

    #[test]
    fn test_render_rejects_traversal() {
        let (artist, mut work) = (artist(), work());
        work.name = "..".to_string();
        let ctx = NamingContext {
            artist: &artist,
            work: &work,
            page: None,
        };
        assert!(render_template("<work.name>", &ctx).is_err());
    }

    #[test]
    fn test_page_token_needs_page() {
        let (artist, work) = (artist(), work());
        let ctx = NamingContext {
            artist: &artist,
            work: &work,
            page: None,
        };
        assert!(render_template("<work.page>", &ctx).is_err());
    }

    #[test]
    fn test_validate_template() {
        assert!(validate_template("f", "<artist.name>/(<work_id>) <work.name>", false).is_ok());
        assert!(validate_template("f", "<work.page>", true).is_ok());
        assert!(validate_template("f", "<work.page>", false).is_err());
        assert!(validate_template("f", "<nope>", true).is_err());
        assert!(validate_template("f", "a < b", true).is_ok());
    }

    #[test]
    fn test_sanitize_path_component() {
        assert_eq!(sanitize_path_component("Wait...").unwrap(), "Wait...");
        assert_eq!(
            sanitize_path_component("path/to/name").unwrap(),
            "path_to_name"
        );
        assert!(sanitize_path_component("..").is_err());
        assert!(sanitize_path_component(" ").is_err());
    }
}
