//! Named cell formats shared by the report writers and the builder

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatUnderline};

const GRAY: u32 = 0xBDBDBD;
const RED: u32 = 0xF5A9BC;
const YELLOW: u32 = 0xF2F5A9;
const GREEN: u32 = 0x04B404;
const INPUT_GREEN: u32 = 0xC1D4AB;
const ROW_BLUE: u32 = 0xBED1DE;
const LINK_BLUE: u32 = 0x0000FF;

/// Every format a laborplan workbook uses
#[derive(Clone, Debug)]
pub struct ReportFormats {
    pub bold: Format,
    pub big_bold: Format,
    pub bold_center: Format,
    pub bold_right: Format,
    pub right: Format,
    pub center: Format,
    pub border: Format,
    pub bold_border: Format,
    pub percent: Format,
    pub link: Format,

    // Header blocks
    pub gray: Format,
    pub gray_right: Format,
    pub gray_center: Format,
    /// Quarter headers above gray month blocks
    pub merge_header: Format,
    /// Quarter headers on individual sheets
    pub merge_border: Format,

    // Coverage bands and their legend
    pub band_red: Format,
    pub band_yellow: Format,
    pub band_green: Format,
    pub key_red: Format,
    pub key_yellow: Format,
    pub key_green: Format,

    // Builder input sheets
    pub input: Format,
    pub note: Format,
    pub bold_center_border: Format,
    pub gray_center_wrap: Format,
    pub row_even: Format,
    pub row_odd: Format,
    pub percent_even: Format,
    pub percent_odd: Format,
}

impl ReportFormats {
    pub fn new() -> Self {
        let gray = Format::new()
            .set_background_color(GRAY)
            .set_border(FormatBorder::Thin);
        let band = |color: u32| Format::new().set_background_color(color);
        let key = |color: u32| {
            Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(color)
        };

        Self {
            bold: Format::new().set_bold(),
            big_bold: Format::new().set_bold().set_font_size(22),
            bold_center: Format::new().set_bold().set_align(FormatAlign::Center),
            bold_right: Format::new().set_bold().set_align(FormatAlign::Right),
            right: Format::new().set_align(FormatAlign::Right),
            center: Format::new().set_align(FormatAlign::Center),
            border: Format::new().set_border(FormatBorder::Thin),
            bold_border: Format::new().set_bold().set_border(FormatBorder::Thin),
            percent: Format::new().set_num_format("0%"),
            link: Format::new()
                .set_font_color(LINK_BLUE)
                .set_underline(FormatUnderline::Single),

            gray_right: gray.clone().set_align(FormatAlign::Right),
            gray_center: gray.clone().set_align(FormatAlign::Center),
            gray_center_wrap: gray.clone().set_align(FormatAlign::Center).set_text_wrap(),
            gray,
            merge_header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_border_bottom(FormatBorder::Thin),
            merge_border: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),

            band_red: band(RED),
            band_yellow: band(YELLOW),
            band_green: band(GREEN),
            key_red: key(RED),
            key_yellow: key(YELLOW),
            key_green: key(GREEN),

            input: Format::new()
                .set_background_color(INPUT_GREEN)
                .set_border(FormatBorder::Thin),
            note: Format::new().set_font_color(0xFF0000).set_text_wrap(),
            bold_center_border: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            row_even: Format::new().set_border(FormatBorder::Thin),
            row_odd: Format::new()
                .set_background_color(ROW_BLUE)
                .set_border(FormatBorder::Thin),
            percent_even: Format::new()
                .set_num_format("0%")
                .set_border(FormatBorder::Thin),
            percent_odd: Format::new()
                .set_num_format("0%")
                .set_background_color(ROW_BLUE)
                .set_border(FormatBorder::Thin),
        }
    }
}

impl Default for ReportFormats {
    fn default() -> Self {
        Self::new()
    }
}
