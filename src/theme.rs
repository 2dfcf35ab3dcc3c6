use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f64,
    pub title_font_size: f64,
    pub axis_title_font_size: f64,
    pub tick_label_font_size: f64,
    pub text_color: String,
    pub axis_color: String,
    pub grid_color: String,
    pub point_color: String,
    pub point_stroke: String,
    pub legend_background: String,
    pub legend_border: String,
    pub background: String,
    pub palette: Vec<String>,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            title_font_size: 18.0,
            axis_title_font_size: 14.0,
            tick_label_font_size: 12.0,
            text_color: "#333333".to_string(),
            axis_color: "#333333".to_string(),
            grid_color: "#DDDDDD".to_string(),
            point_color: "#4E79A7".to_string(),
            point_stroke: "#FFFFFF".to_string(),
            legend_background: "#FFFFFF".to_string(),
            legend_border: "#AAAAAA".to_string(),
            background: "#FFFFFF".to_string(),
            palette: vec![
                "#4e79a7".to_string(),
                "#f28e2c".to_string(),
                "#e15759".to_string(),
                "#76b7b2".to_string(),
                "#59a14f".to_string(),
                "#edc949".to_string(),
                "#af7aa1".to_string(),
                "#ff9da7".to_string(),
            ],
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            title_font_size: 17.0,
            axis_title_font_size: 13.0,
            tick_label_font_size: 11.0,
            text_color: "#1C2430".to_string(),
            axis_color: "#7A8AA6".to_string(),
            grid_color: "#E6EBF3".to_string(),
            point_color: "#6366F1".to_string(),
            point_stroke: "#FFFFFF".to_string(),
            legend_background: "#FFFFFF".to_string(),
            legend_border: "#D7E0F0".to_string(),
            background: "#FFFFFF".to_string(),
            palette: vec![
                "#6366f1".to_string(), // indigo
                "#f59e0b".to_string(), // amber
                "#10b981".to_string(), // emerald
                "#ef4444".to_string(), // red
                "#8b5cf6".to_string(), // violet
                "#06b6d4".to_string(), // cyan
            ],
        }
    }

    /// Palette color for the `index`-th overlay, cycling when exhausted.
    pub fn palette_color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return self.axis_color.as_str();
        }
        self.palette[index % self.palette.len()].as_str()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
