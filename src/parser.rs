use crate::error::RenderResult;
use crate::ir::Widget;

/// Parse widget parameters from JSON or JSON5 text.
pub fn parse_widget(input: &str) -> RenderResult<Widget> {
    let widget: Widget = json5::from_str(input)?;
    Ok(widget)
}
