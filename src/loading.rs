use crate::ui::ListSettings;
use crate::ui::demo::DemoSpec;

/// Parse a KDL file and return the document. Logs a warning and returns None on failure.
fn parse_kdl_file(path: &str) -> Option<kdl::KdlDocument> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("failed to read {}: {}", path, e);
            return None;
        }
    };
    match content.parse::<kdl::KdlDocument>() {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("failed to parse KDL {}: {}", path, e);
            None
        }
    }
}

/// Helper to get a string property of a node.
fn prop_str<'a>(node: &'a kdl::KdlNode, key: &str) -> Option<&'a str> {
    node.get(key)?.as_string()
}

/// Helper to get an f64 property of a node.
/// Accepts both float and integer values.
fn prop_f64(node: &kdl::KdlNode, key: &str) -> Option<f64> {
    let val = node.get(key)?;
    val.as_float()
        .or_else(|| val.as_integer().map(|i| i as f64))
}

/// Helper to get a flag property of a node: any non-zero integer is set.
fn prop_flag(node: &kdl::KdlNode, key: &str) -> bool {
    node.get(key)
        .and_then(|v| v.as_integer())
        .is_some_and(|i| i != 0)
}

/// Load list tunables from a RON file, falling back to defaults.
pub fn load_settings(path: &str) -> ListSettings {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("failed to read {}: {}, using default settings", path, e);
            return ListSettings::default();
        }
    };
    match ron::from_str::<ListSettings>(&content) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("failed to parse RON {}: {}, using default settings", path, e);
            ListSettings::default()
        }
    }
}

/// Load demo entries from a KDL file. Missing or malformed files yield no
/// entries.
pub fn load_demo_entries(path: &str) -> Vec<DemoSpec> {
    let Some(doc) = parse_kdl_file(path) else {
        return Vec::new();
    };
    parse_demo_entries(&doc)
}

/// Convert a KDL document into demo entry specs. Node names select the
/// entry kind, the first argument is the label:
///
/// ```kdl
/// group "Video" expanded=1 {
///     slider "Brightness" value=50 min=0 max=100
///     toggle "VSync" value=1
/// }
/// text "Player Name" value="steve"
/// pair "Jump" key="Space" value="press"
/// ```
pub fn parse_demo_entries(doc: &kdl::KdlDocument) -> Vec<DemoSpec> {
    doc.nodes().iter().filter_map(parse_demo_node).collect()
}

fn parse_demo_node(node: &kdl::KdlNode) -> Option<DemoSpec> {
    let kind = node.name().to_string();
    let Some(label) = node.get(0).and_then(|v| v.as_string()) else {
        log::warn!("demo entry {:?} has no label, skipping", kind);
        return None;
    };
    let label = label.to_string();
    let spec = match kind.as_str() {
        "text" => DemoSpec::Text {
            label,
            value: prop_str(node, "value").unwrap_or("").to_string(),
        },
        "toggle" => DemoSpec::Toggle {
            label,
            value: prop_flag(node, "value"),
        },
        "pair" => DemoSpec::Pair {
            label,
            key: prop_str(node, "key").unwrap_or("").to_string(),
            value: prop_str(node, "value").unwrap_or("").to_string(),
        },
        "slider" => {
            let min = prop_f64(node, "min").unwrap_or(0.0) as f32;
            let max = prop_f64(node, "max").unwrap_or(100.0) as f32;
            DemoSpec::Slider {
                label,
                value: prop_f64(node, "value").map_or(min, |v| v as f32),
                min,
                max: max.max(min),
            }
        }
        "group" => DemoSpec::Group {
            title: label,
            expanded: prop_flag(node, "expanded"),
            children: node
                .children()
                .map(parse_demo_entries)
                .unwrap_or_default(),
        },
        other => {
            log::warn!("unknown demo entry kind {:?}, skipping", other);
            return None;
        }
    };
    Some(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_demo_entries_from_file() {
        let specs = load_demo_entries("data/demo_entries.kdl");
        assert!(!specs.is_empty());
        assert!(
            specs
                .iter()
                .any(|s| matches!(s, DemoSpec::Group { children, .. } if !children.is_empty()))
        );
    }

    #[test]
    fn test_parse_nested_groups() {
        let doc: kdl::KdlDocument = r#"
            group "Video" expanded=1 {
                slider "Brightness" value=50 min=0 max=100
                toggle "VSync" value=1
            }
            pair "Jump" key="Space" value="press"
        "#
        .parse()
        .expect("valid KDL");
        let specs = parse_demo_entries(&doc);
        assert_eq!(specs.len(), 2);
        let DemoSpec::Group {
            title,
            expanded,
            children,
        } = &specs[0]
        else {
            panic!("expected a group, got {:?}", specs[0]);
        };
        assert_eq!(title, "Video");
        assert!(*expanded);
        assert_eq!(
            children[0],
            DemoSpec::Slider {
                label: "Brightness".to_string(),
                value: 50.0,
                min: 0.0,
                max: 100.0,
            }
        );
        assert_eq!(
            children[1],
            DemoSpec::Toggle {
                label: "VSync".to_string(),
                value: true,
            }
        );
    }

    #[test]
    fn test_unknown_and_unlabelled_nodes_are_skipped() {
        let doc: kdl::KdlDocument = r#"
            knob "Gain"
            text
            text "Name" value="x"
        "#
        .parse()
        .expect("valid KDL");
        assert_eq!(
            parse_demo_entries(&doc),
            vec![DemoSpec::Text {
                label: "Name".to_string(),
                value: "x".to_string(),
            }]
        );
    }

    #[test]
    fn test_load_missing_file_no_panic() {
        assert!(load_demo_entries("nonexistent.kdl").is_empty());
        let settings = load_settings("nonexistent.ron");
        assert_eq!(settings.history_size, ListSettings::default().history_size);
    }

    #[test]
    fn test_load_settings_from_file() {
        let settings = load_settings("data/list.ron");
        assert!(settings.smooth_scrolling);
        assert!(settings.wheel_step > 0.0);
    }
}
