use crate::error::Result;
use crate::types::Mirror;
use regex::Regex;
use reqwest::Url;
use std::collections::HashSet;

/// Matches `#Server = https://host/path/$repo/os/$arch`, commented or not.
const SERVER_LINE: &str = r"^\s*#?\s*Server\s*=\s*(\S+?)/\$repo/os/\$arch\s*$";

/// Extract mirror base URLs from a pacman mirror list.
///
/// Non-server lines are skipped, the `$repo/os/$arch` template is stripped,
/// anything that is not an absolute http(s) URL is dropped and duplicates
/// keep their first position.
pub fn parse_mirror_list(content: &str) -> Result<Vec<Mirror>> {
    let re = Regex::new(SERVER_LINE)?;
    let mut seen = HashSet::new();
    let mut mirrors = Vec::new();

    for line in content.lines() {
        let Some(caps) = re.captures(line) else {
            continue;
        };

        let base = caps[1].trim_end_matches('/');
        if !is_http_url(base) {
            tracing::debug!("skipping invalid mirror URL: {}", base);
            continue;
        }

        if seen.insert(base.to_string()) {
            mirrors.push(Mirror::new(base));
        }
    }

    Ok(mirrors)
}

fn is_http_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"##
## Arch Linux repository mirrorlist
## Generated on 2024-05-01
##

## Worldwide
#Server = https://geo.mirror.pkgbuild.com/$repo/os/$arch
#Server = http://mirror.rackspace.com/archlinux/$repo/os/$arch

## Germany
#Server = https://mirror.example.de/archlinux/$repo/os/$arch
#Server=https://geo.mirror.pkgbuild.com/$repo/os/$arch
Server = https://uncommented.example.org/arch/$repo/os/$arch
#Server = ftp://old.example.net/arch/$repo/os/$arch
#Server = not a url/$repo/os/$arch
#Server = https://no-template.example.com/arch
"#;

    #[test]
    fn test_parse_mirror_list() -> Result<()> {
        let mirrors = parse_mirror_list(SAMPLE)?;
        let urls: Vec<&str> = mirrors.iter().map(|m| m.url.as_str()).collect();

        assert_eq!(
            urls,
            vec![
                "https://geo.mirror.pkgbuild.com",
                "http://mirror.rackspace.com/archlinux",
                "https://mirror.example.de/archlinux",
                "https://uncommented.example.org/arch",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parse_empty_list() -> Result<()> {
        assert!(parse_mirror_list("")?.is_empty());
        assert!(parse_mirror_list("## nothing here\n\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_trailing_slash_is_deduplicated() -> Result<()> {
        let content = "#Server = https://a.example.org/arch//$repo/os/$arch\n\
                       #Server = https://a.example.org/arch/$repo/os/$arch\n";
        let mirrors = parse_mirror_list(content)?;
        assert_eq!(mirrors, vec![Mirror::new("https://a.example.org/arch")]);
        Ok(())
    }
}
