use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub description_font_size: f32,
    pub node_fill: String,
    pub node_border: String,
    pub title_color: String,
    pub text_color: String,
    pub background: String,
}

impl Theme {
    /// Plain cards on white, close to the stock demo page.
    pub fn classic() -> Self {
        Self {
            font_family: "verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            description_font_size: 11.0,
            node_fill: "#FFFFFF".to_string(),
            node_border: "#000000".to_string(),
            title_color: "#000000".to_string(),
            text_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            description_font_size: 11.0,
            node_fill: "#F8FAFF".to_string(),
            node_border: "#C7D2E5".to_string(),
            title_color: "#1C2430".to_string(),
            text_color: "#5A6478".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "classic" | "default" => Some(Self::classic()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
