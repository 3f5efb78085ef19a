use crate::error::Result;
use regex::Regex;

/// Ordered list of patterns that locate the version pinned for one package.
///
/// Patterns run from most specific to most permissive and the first match wins,
/// so loose patterns only apply when nothing stricter matched. Extraction and
/// substitution share the same list.
pub struct ManifestPatterns {
    patterns: Vec<Regex>,
}

impl ManifestPatterns {
    pub fn for_package(package: &str) -> Result<Self> {
        let id = format!("(?i:{})", regex::escape(package));
        let sources = [
            // <PackageReference Include="X" Version="1.0.0" />
            format!(r#"<PackageReference\s+Include="{id}"\s+Version="([^"]+)""#),
            // extra attributes between Include and Version
            format!(r#"<PackageReference\s+Include="{id}"[^>]*?\sVersion="([^"]+)""#),
            // <PackageReference Include="X"><Version>1.0.0</Version></PackageReference>
            format!(r#"<PackageReference\s+Include="{id}"\s*>\s*<Version>\s*([^<\s]+)\s*</Version>"#),
            // anything mentioning the id followed eventually by a Version attribute
            format!(r#"(?s){id}.*?Version="([^"]+)""#),
        ];

        let patterns = sources
            .iter()
            .map(|source| Regex::new(source))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Captured version from the first matching pattern.
    pub fn find_version(&self, content: &str) -> Option<String> {
        self.patterns.iter().find_map(|re| {
            re.captures(content)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
    }

    /// Rewrite only the captured version group of the first matching pattern.
    /// Returns `None` when no pattern matches.
    pub fn replace_version(&self, content: &str, new_version: &str) -> Option<String> {
        let group = self
            .patterns
            .iter()
            .find_map(|re| re.captures(content).and_then(|caps| caps.get(1)))?;

        let mut updated = String::with_capacity(content.len() + new_version.len());
        updated.push_str(&content[..group.start()]);
        updated.push_str(new_version);
        updated.push_str(&content[group.end()..]);
        Some(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE: &str = "CounterStrikeSharp.API";

    fn patterns() -> ManifestPatterns {
        ManifestPatterns::for_package(PACKAGE).unwrap()
    }

    #[test]
    fn finds_bare_include_and_version_attributes() {
        let content = r#"Include="CounterStrikeSharp.API" Version="1.0.140""#;
        assert_eq!(patterns().find_version(content).as_deref(), Some("1.0.140"));
    }

    #[test]
    fn prefers_exact_package_reference_over_loose_mentions() {
        let content = r#"<Project>
  <!-- CounterStrikeSharp.API docs Version="9.9.9" -->
  <ItemGroup>
    <PackageReference Include="CounterStrikeSharp.API" Version="1.0.140" />
  </ItemGroup>
</Project>"#;
        assert_eq!(patterns().find_version(content).as_deref(), Some("1.0.140"));
    }

    #[test]
    fn finds_child_version_element() {
        let content = r#"<PackageReference Include="CounterStrikeSharp.API">
      <Version>1.0.120</Version>
    </PackageReference>"#;
        assert_eq!(patterns().find_version(content).as_deref(), Some("1.0.120"));
    }

    #[test]
    fn does_not_match_other_packages() {
        let content = r#"<PackageReference Include="Newtonsoft.Json" Version="13.0.3" />"#;
        assert_eq!(patterns().find_version(content), None);
    }

    #[test]
    fn replace_touches_only_the_version_group() {
        let content = r#"<ItemGroup>
    <PackageReference Include="Newtonsoft.Json" Version="13.0.3" />
    <PackageReference Include="CounterStrikeSharp.API" Version="1.0.140" ExcludeAssets="runtime" />
</ItemGroup>"#;
        let updated = patterns().replace_version(content, "1.0.150").unwrap();
        assert_eq!(updated, content.replace("1.0.140", "1.0.150"));
        assert!(updated.contains(r#"Version="13.0.3""#));
    }

    #[test]
    fn replace_returns_none_without_reference() {
        assert!(patterns().replace_version("<Project />", "1.0.0").is_none());
    }
}
