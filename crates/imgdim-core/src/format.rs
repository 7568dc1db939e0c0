//! CSS snippet inserted below the cursor.

use crate::model::ImageDimensions;

/// Two tab-indented declarations, each ending with a line break. The missing
/// space after `height:` is part of the established output.
pub fn insertion_text(dims: ImageDimensions) -> String {
    format!(
        "\twidth: {}px;\n\theight:{}px;\n",
        dims.width, dims.height
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_bytes() {
        let text = insertion_text(ImageDimensions {
            width: 320,
            height: 240,
        });
        assert_eq!(text, "\twidth: 320px;\n\theight:240px;\n");
    }
}
