//! Printable camp report: camp details followed by the donor register.
//!
//! Layout is computed first as plain positioned text runs, which keeps the
//! pagination rules testable, and then rendered to PDF with `printpdf`.
//! Coordinates are millimetres measured from the top-left corner of an A4
//! portrait page.

use anyhow::{anyhow, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use shared::CampInfo;

use crate::backend::domain::models::donor::Donor;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_MM: f32 = 14.0;
const MARGIN_TOP_MM: f32 = 20.0;
const MARGIN_BOTTOM_MM: f32 = 15.0;

const TITLE_SIZE: f32 = 20.0;
const META_SIZE: f32 = 12.0;
const TABLE_SIZE: f32 = 10.0;

const META_START_MM: f32 = 30.0;
const META_LINE_MM: f32 = 8.0;
const DESCRIPTION_LINE_MM: f32 = 6.0;
const DESCRIPTION_GAP_MM: f32 = 4.0;
const DESCRIPTION_WRAP_MM: f32 = 180.0;
const ROW_HEIGHT_MM: f32 = 7.0;
/// Spacing of wrapped lines inside one table row
const TABLE_LINE_MM: f32 = 4.5;
/// Lowest baseline allowed on a page
const CONTENT_BOTTOM_MM: f32 = PAGE_HEIGHT_MM - MARGIN_BOTTOM_MM;
const CELL_PADDING_MM: f32 = 1.5;

/// Helvetica averages about half an em per glyph; 1pt = 0.3528mm
const AVG_GLYPH_EM: f32 = 0.5;
const MM_PER_PT: f32 = 0.3528;

pub const DEFAULT_CAMP_TITLE: &str = "Blood Donation Camp";
pub const NO_DONORS_TEXT: &str = "No donors found.";

pub const TABLE_HEADERS: [&str; 7] = ["S.No.", "Name", "Gender", "Blood Type", "Contact", "City", "Address"];
const COLUMN_WIDTHS_MM: [f32; 7] = [12.0, 32.0, 18.0, 22.0, 28.0, 28.0, 50.0];

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub size: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub title: String,
    pub pages: Vec<Vec<TextRun>>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

fn chars_per_width(width_mm: f32, size: f32) -> usize {
    let glyph_mm = size * AVG_GLYPH_EM * MM_PER_PT;
    ((width_mm / glyph_mm).floor() as usize).max(1)
}

/// Greedy word wrap on an approximate character budget
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        // Hard-split words that can never fit on a line
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap a cell to its column; an empty cell still occupies one line
fn cell_lines(text: &str, width_mm: f32) -> Vec<String> {
    let lines = wrap_text(text, chars_per_width(width_mm - 2.0 * CELL_PADDING_MM, TABLE_SIZE));
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

fn row_cells(cells: [String; 7]) -> Vec<Vec<String>> {
    cells
        .iter()
        .zip(COLUMN_WIDTHS_MM)
        .map(|(cell, width)| cell_lines(cell, width))
        .collect()
}

/// Places text top to bottom, starting a new page at the bottom margin.
/// `y` is the baseline of the next line.
struct PageCursor {
    pages: Vec<Vec<TextRun>>,
    page: Vec<TextRun>,
    y: f32,
}

impl PageCursor {
    fn new(first_run: TextRun, y: f32) -> Self {
        Self {
            pages: Vec::new(),
            page: vec![first_run],
            y,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.page));
        self.y = MARGIN_TOP_MM;
    }

    /// Start a new page if a line at the current position would overflow
    fn ensure_line(&mut self) {
        if self.y > CONTENT_BOTTOM_MM {
            self.new_page();
        }
    }

    fn meta_line(&mut self, text: String, advance: f32) {
        self.ensure_line();
        self.page.push(TextRun {
            text,
            x_mm: MARGIN_LEFT_MM,
            y_mm: self.y,
            size: META_SIZE,
            bold: false,
        });
        self.y += advance;
    }

    /// How many table lines still fit on this page
    fn table_lines_left(&self) -> usize {
        if self.y > CONTENT_BOTTOM_MM {
            0
        } else {
            ((CONTENT_BOTTOM_MM - self.y) / TABLE_LINE_MM).floor() as usize + 1
        }
    }

    /// Place lines `start..end` of every cell as one row
    fn table_row(&mut self, cells: &[Vec<String>], start: usize, end: usize, bold: bool) {
        let mut x = MARGIN_LEFT_MM;
        for (lines, width) in cells.iter().zip(COLUMN_WIDTHS_MM) {
            for (offset, line) in lines.iter().enumerate().take(end).skip(start) {
                if !line.is_empty() {
                    self.page.push(TextRun {
                        text: line.clone(),
                        x_mm: x + CELL_PADDING_MM,
                        y_mm: self.y + (offset - start) as f32 * TABLE_LINE_MM,
                        size: TABLE_SIZE,
                        bold,
                    });
                }
            }
            x += width;
        }
        self.y += ROW_HEIGHT_MM + (end - start).saturating_sub(1) as f32 * TABLE_LINE_MM;
    }

    fn finish(mut self) -> Vec<Vec<TextRun>> {
        self.pages.push(self.page);
        self.pages
    }
}

fn line_count(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(1)
}

/// Place the camp details and the donor table (in the given order) on pages.
///
/// Cell text wraps inside its column and the row grows to the tallest cell.
/// A row that does not fit moves to the next page under a repeated header;
/// a row taller than a whole page continues across pages.
pub fn layout_document(camp: &CampInfo, donors: &[Donor]) -> DocumentLayout {
    let title = match camp.name.trim() {
        "" => DEFAULT_CAMP_TITLE.to_string(),
        name => name.to_string(),
    };

    let mut cursor = PageCursor::new(
        TextRun {
            text: title.clone(),
            x_mm: MARGIN_LEFT_MM,
            y_mm: MARGIN_TOP_MM,
            size: TITLE_SIZE,
            bold: true,
        },
        META_START_MM,
    );

    if !camp.date.trim().is_empty() {
        cursor.meta_line(format!("Date: {}", camp.date.trim()), META_LINE_MM);
    }
    if !camp.location.trim().is_empty() {
        cursor.meta_line(format!("Location: {}", camp.location.trim()), META_LINE_MM);
    }
    if !camp.description.trim().is_empty() {
        let description = format!("Description: {}", camp.description.trim());
        for line in wrap_text(&description, chars_per_width(DESCRIPTION_WRAP_MM, META_SIZE)) {
            cursor.meta_line(line, DESCRIPTION_LINE_MM);
        }
        cursor.y += DESCRIPTION_GAP_MM;
    }

    if donors.is_empty() {
        cursor.meta_line(NO_DONORS_TEXT.to_string(), META_LINE_MM);
        return DocumentLayout {
            title,
            pages: cursor.finish(),
        };
    }

    let header = row_cells(TABLE_HEADERS.map(String::from));
    let header_lines = line_count(&header);

    // The header never sits alone at the bottom of a page
    if cursor.table_lines_left() < header_lines + 1 {
        cursor.new_page();
    }
    cursor.table_row(&header, 0, header_lines, true);
    let mut rows_on_page = 0;

    for (i, donor) in donors.iter().enumerate() {
        let cells = row_cells([
            (i + 1).to_string(),
            donor.name.clone(),
            donor.gender.to_string(),
            donor.blood_type.to_string(),
            donor.phone_number.clone(),
            donor.city.clone(),
            donor.address.clone(),
        ]);
        let total = line_count(&cells);
        let mut start = 0;

        loop {
            let room = cursor.table_lines_left();
            if room >= total - start {
                cursor.table_row(&cells, start, total, false);
                break;
            }
            if room > 0 && (start > 0 || rows_on_page == 0) {
                cursor.table_row(&cells, start, start + room, false);
                start += room;
            }
            cursor.new_page();
            cursor.table_row(&header, 0, header_lines, true);
            rows_on_page = 0;
        }
        rows_on_page += 1;
    }

    DocumentLayout {
        title,
        pages: cursor.finish(),
    }
}

/// Render a computed layout as PDF bytes
pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Page 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("Failed to load Helvetica: {:?}", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("Failed to load Helvetica-Bold: {:?}", e))?;

    for (i, runs) in layout.pages.iter().enumerate() {
        let (page, layer) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", i + 1),
            )
        };
        let current = doc.get_page(page).get_layer(layer);
        for run in runs {
            let font = if run.bold { &bold } else { &regular };
            current.use_text(
                run.text.as_str(),
                run.size,
                Mm(run.x_mm),
                Mm(PAGE_HEIGHT_MM - run.y_mm),
                font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow!("Failed to render PDF: {:?}", e))
}

/// The complete camp report as PDF bytes
pub fn to_document(camp: &CampInfo, donors: &[Donor]) -> Result<Vec<u8>> {
    render_pdf(&layout_document(camp, donors))
}

/// `"<camp name>-details.pdf"` with only letters, digits, `_` and `-` kept
/// and whitespace runs turned into single dashes
pub fn camp_document_filename(camp_name: &str) -> String {
    let kept: String = camp_name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_' || *c == '-')
        .collect();
    let slug = kept.split_whitespace().collect::<Vec<_>>().join("-");
    let slug = if slug.is_empty() { "camp".to_string() } else { slug };
    format!("{}-details.pdf", slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::{BloodType, Gender};

    fn donor(i: usize) -> Donor {
        Donor {
            id: format!("id-{}", i),
            name: format!("Donor Number {}", i),
            gender: if i % 2 == 0 { Gender::Male } else { Gender::Female },
            blood_type: BloodType::OPositive,
            phone_number: "9123456789".to_string(),
            age: None,
            address: "Plot 7, Gandhi Nagar, Near the Water Tank, Ward 12".to_string(),
            city: "Indore".to_string(),
            is_first_time: false,
            is_dikshit: false,
            created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, i as u32 % 60).unwrap(),
        }
    }

    fn texts(page: &[TextRun]) -> Vec<&str> {
        page.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_title_defaults_and_optional_meta_lines() {
        let layout = layout_document(&CampInfo::default(), &[]);
        assert_eq!(layout.title, DEFAULT_CAMP_TITLE);
        assert_eq!(layout.page_count(), 1);
        assert_eq!(texts(&layout.pages[0]), vec![DEFAULT_CAMP_TITLE, NO_DONORS_TEXT]);

        let camp = CampInfo {
            name: "  Mega Camp ".into(),
            date: "2025-01-15".into(),
            location: "Community Hall".into(),
            description: String::new(),
        };
        let layout = layout_document(&camp, &[]);
        assert_eq!(
            texts(&layout.pages[0]),
            vec!["Mega Camp", "Date: 2025-01-15", "Location: Community Hall", NO_DONORS_TEXT]
        );
    }

    #[test]
    fn test_table_rows_are_numbered_in_given_order() {
        let donors: Vec<Donor> = (1..=3).map(donor).collect();
        let layout = layout_document(&CampInfo::default(), &donors);
        assert_eq!(layout.page_count(), 1);

        let page = texts(&layout.pages[0]);
        assert_eq!(&page[1..8], &TABLE_HEADERS);
        assert_eq!(page[8], "1");
        assert_eq!(page[9], "Donor Number 1");
        assert_eq!(page[10], "female");
        assert_eq!(page[11], "O+");
        assert!(page.contains(&"3"));
        assert!(!page.contains(&NO_DONORS_TEXT));
    }

    #[test]
    fn test_long_register_paginates_with_repeated_header() {
        let donors: Vec<Donor> = (1..=100).map(donor).collect();
        let layout = layout_document(&CampInfo::default(), &donors);
        assert!(layout.page_count() > 1);

        for page in &layout.pages[1..] {
            assert_eq!(page[0].text, "S.No.");
            assert!(page[0].bold);
        }
        for page in &layout.pages {
            assert!(page.iter().all(|r| r.y_mm <= CONTENT_BOTTOM_MM));
        }

        // Every serial number appears exactly once across all pages
        let serials: Vec<String> = layout
            .pages
            .iter()
            .flatten()
            .filter(|r| r.x_mm == MARGIN_LEFT_MM + CELL_PADDING_MM && !r.bold)
            .map(|r| r.text.clone())
            .collect();
        let expected: Vec<String> = (1..=100).map(|i| i.to_string()).collect();
        assert_eq!(serials, expected);
    }

    /// Texts of one column, top to bottom, joined back into one string
    fn column_text(page: &[TextRun], column: usize) -> String {
        let x = MARGIN_LEFT_MM + COLUMN_WIDTHS_MM[..column].iter().sum::<f32>() + CELL_PADDING_MM;
        page.iter()
            .filter(|r| r.x_mm == x && !r.bold)
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn word_count(layout: &DocumentLayout, word: &str) -> usize {
        layout
            .pages
            .iter()
            .flatten()
            .map(|r| r.text.split_whitespace().filter(|w| *w == word).count())
            .sum()
    }

    #[test]
    fn test_long_cells_wrap_without_losing_text() {
        let mut long = donor(1);
        long.name = "Venkatanarasimha Raghavan Subramanian".to_string();
        let donors = vec![long.clone(), donor(2)];
        let layout = layout_document(&CampInfo::default(), &donors);
        let page = &layout.pages[0];

        let names = column_text(page, 1);
        assert_eq!(names, format!("{} Donor Number 2", long.name));
        let addresses = column_text(page, 6);
        assert_eq!(addresses, format!("{} {}", long.address, donor(2).address));
        assert!(page.iter().all(|r| !r.text.ends_with("...")));

        // The second row starts below the last wrapped line of the first
        let name_tail = page.iter().find(|r| r.text == "Subramanian").expect("wrapped name");
        let second_row = page.iter().find(|r| r.text == "2").expect("second serial");
        assert!(second_row.y_mm > name_tail.y_mm);
    }

    #[test]
    fn test_long_description_flows_onto_next_page() {
        let camp = CampInfo {
            description: "word ".repeat(1500),
            ..Default::default()
        };
        let donors: Vec<Donor> = (1..=30).map(donor).collect();
        let layout = layout_document(&camp, &donors);

        assert!(layout.page_count() > 1);
        for page in &layout.pages {
            assert!(page.iter().all(|r| r.y_mm <= CONTENT_BOTTOM_MM));
        }
        assert_eq!(word_count(&layout, "word"), 1500);

        // Every page holding table rows shows the header
        for page in &layout.pages {
            if page.iter().any(|r| r.size == TABLE_SIZE) {
                assert!(page.iter().any(|r| r.bold && r.text == "S.No."));
            }
        }
    }

    #[test]
    fn test_row_taller_than_a_page_continues_on_the_next() {
        let mut huge = donor(1);
        huge.address = "lane ".repeat(400).trim().to_string();
        let layout = layout_document(&CampInfo::default(), &[huge]);

        assert!(layout.page_count() > 1);
        assert_eq!(word_count(&layout, "lane"), 400);
        for page in &layout.pages {
            assert!(page.iter().all(|r| r.y_mm <= CONTENT_BOTTOM_MM));
        }
        assert_eq!(layout.pages[1][0].text, "S.No.");
    }

    #[test]
    fn test_description_wraps() {
        let camp = CampInfo {
            description: "word ".repeat(60),
            ..Default::default()
        };
        let layout = layout_document(&camp, &[]);
        let description_lines = layout.pages[0]
            .iter()
            .filter(|r| r.size == META_SIZE && r.text != NO_DONORS_TEXT)
            .count();
        assert!(description_lines > 1);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let donors: Vec<Donor> = (1..=60).map(donor).collect();
        let layout = layout_document(&CampInfo::default(), &donors);
        let bytes = render_pdf(&layout).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_camp_document_filename() {
        assert_eq!(camp_document_filename("Shri Camp 2025!"), "Shri-Camp-2025-details.pdf");
        assert_eq!(camp_document_filename("  a   b_c-d  "), "a-b_c-d-details.pdf");
        assert_eq!(camp_document_filename(""), "camp-details.pdf");
        assert_eq!(camp_document_filename("???"), "camp-details.pdf");
    }
}
