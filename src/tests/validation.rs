//! Structural checks on rendered playlists

/// Validation result
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

fn declared_version(content: &str) -> Option<u8> {
    content
        .lines()
        .find_map(|l| l.strip_prefix("#EXT-X-VERSION:"))
        .and_then(|v| v.trim().parse().ok())
}

/// Validate media playlist structure
pub fn validate_media_playlist(content: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !content.starts_with("#EXTM3U\n") {
        errors.push("Missing #EXTM3U header".to_string());
    }

    let version = declared_version(content);
    if version.is_none() {
        errors.push("Missing #EXT-X-VERSION tag".to_string());
    }
    let version = version.unwrap_or(0);

    let target = content
        .lines()
        .find_map(|l| l.strip_prefix("#EXT-X-TARGETDURATION:"))
        .map(|t| t.parse::<u64>());
    let target = match target {
        Some(Ok(t)) => Some(t),
        Some(Err(_)) => {
            errors.push("#EXT-X-TARGETDURATION is not an integer".to_string());
            None
        }
        None => {
            errors.push("Missing #EXT-X-TARGETDURATION tag".to_string());
            None
        }
    };

    if !content.contains("#EXT-X-MEDIA-SEQUENCE:") {
        errors.push("Missing #EXT-X-MEDIA-SEQUENCE tag".to_string());
    }

    // every #EXTINF is followed by a URI before the next #EXTINF
    let mut awaiting_uri = false;
    for line in content.lines() {
        if let Some(value) = line.strip_prefix("#EXTINF:") {
            if awaiting_uri {
                errors.push("#EXTINF without URI".to_string());
            }
            awaiting_uri = true;

            let duration = value.split(',').next().unwrap_or_default();
            match (duration.parse::<f64>(), target) {
                (Ok(d), Some(t)) if d.ceil() as u64 > t => {
                    errors.push(format!("Segment duration {} exceeds target {}", d, t))
                }
                (Err(_), _) => errors.push(format!("Invalid #EXTINF duration: {}", line)),
                _ => {}
            }
        } else if !line.starts_with('#') && !line.trim().is_empty() {
            awaiting_uri = false;
        }
    }
    if awaiting_uri {
        errors.push("Trailing #EXTINF without URI".to_string());
    }

    if content.contains("#EXT-X-BYTERANGE:") && version < 4 {
        errors.push("#EXT-X-BYTERANGE requires version 4".to_string());
    }
    if content.contains("#EXT-X-MAP:") && version < 5 {
        errors.push("#EXT-X-MAP requires version 5".to_string());
    }
    if content.contains("KEYFORMAT=") && version < 5 {
        errors.push("KEYFORMAT requires version 5".to_string());
    }

    if let Some(pos) = content.find("#EXT-X-ENDLIST") {
        if !content[pos..].trim_end().eq("#EXT-X-ENDLIST") {
            errors.push("#EXT-X-ENDLIST is not the last tag".to_string());
        }
    } else if !content.contains("#EXT-X-PLAYLIST-TYPE:") {
        warnings.push("No #EXT-X-ENDLIST (live playlist)".to_string());
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Validate master playlist structure
pub fn validate_master_playlist(content: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !content.starts_with("#EXTM3U\n") {
        errors.push("Missing #EXTM3U header".to_string());
    }
    let version = declared_version(content).unwrap_or(0);

    if !content.contains("#EXT-X-STREAM-INF") {
        warnings.push("No variant streams found".to_string());
    }

    let lines: Vec<&str> = content.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("#EXT-X-MEDIA:") {
            for attr in ["TYPE=", "GROUP-ID=", "NAME="] {
                if !line.contains(attr) {
                    errors.push(format!("#EXT-X-MEDIA missing {}", attr.trim_end_matches('=')));
                }
            }
            if version < 4 {
                errors.push("#EXT-X-MEDIA requires version 4".to_string());
            }
        }

        if line.starts_with("#EXT-X-STREAM-INF:") {
            if !line.contains("BANDWIDTH=") {
                errors.push("STREAM-INF missing BANDWIDTH".to_string());
            }
            match lines.get(i + 1) {
                Some(next) if !next.starts_with('#') && !next.trim().is_empty() => {}
                _ => errors.push("STREAM-INF not followed by a URI".to_string()),
            }
        }

        if line.starts_with("#EXT-X-I-FRAME-STREAM-INF:") && !line.contains("URI=") {
            errors.push("I-FRAME-STREAM-INF missing URI".to_string());
        }
    }

    // every group a variant references is defined
    for line in &lines {
        if !line.starts_with("#EXT-X-STREAM-INF:") {
            continue;
        }
        for (attr, media_type) in [("AUDIO=\"", "AUDIO"), ("SUBTITLES=\"", "SUBTITLES")] {
            if let Some(start) = line.find(attr) {
                let rest = &line[start + attr.len()..];
                let group = rest.split('"').next().unwrap_or_default();
                let definition = format!("TYPE={},GROUP-ID=\"{}\"", media_type, group);
                if !content.contains(&definition) {
                    errors.push(format!("{} group {:?} is not defined", media_type, group));
                }
            }
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures;

    #[test]
    fn test_fixtures_are_valid() {
        for fixture in [
            fixtures::MEDIA_VOD,
            fixtures::MEDIA_BYTERANGE,
            fixtures::MEDIA_SCTE35,
            fixtures::MEDIA_OATCLS,
            fixtures::MEDIA_ENCRYPTED,
            fixtures::MEDIA_LIVE_FMP4,
            fixtures::MEDIA_WIDEVINE,
            fixtures::MEDIA_CUSTOM_TAGS,
        ] {
            let result = validate_media_playlist(fixture);
            assert!(result.is_valid, "{:?}", result.errors);
        }
        let result = validate_master_playlist(fixtures::MASTER);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_detects_problems() {
        let result = validate_media_playlist(
            "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-MEDIA-SEQUENCE:0\n#EXT-X-TARGETDURATION:4\n\
             #EXT-X-BYTERANGE:10\n#EXTINF:6.000,\n#EXTINF:1.000,\na.ts\n",
        );
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);

        let result = validate_master_playlist(
            "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-STREAM-INF:BANDWIDTH=1,AUDIO=\"aac\"\n",
        );
        assert_eq!(result.errors.len(), 2);
    }
}
