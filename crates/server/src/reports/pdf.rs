//! PDF document rendering for report payloads.
//!
//! Lays out a [`ReportPayload`] as a paginated A4 document: header, four
//! summary metric boxes, the per-period table, and the top-10 product table.
//! A single vertical cursor walks down the page; any block that would cross
//! the bottom margin triggers a page break first. Page-number footers need
//! the total page count, which is only known after layout, so they are
//! patched onto every page in a second pass before serialization.
//!
//! Rendering never fails on data content: empty tables produce an explicit
//! "no data" placeholder row instead of an error.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rgb,
};

use super::{ProductSales, ReportError, ReportPayload, ReportPeriod};

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN_X: f64 = 16.0;
const MARGIN_TOP: f64 = 18.0;
const MARGIN_BOTTOM: f64 = 20.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN_X;

const ROW_HEIGHT: f64 = 7.0;
const SECTION_GAP: f64 = 8.0;
const TOP_PRODUCTS: usize = 10;
const NAME_MAX_CHARS: usize = 20;

/// Render a payload into PDF bytes, branded with `depot_name`.
///
/// # Errors
///
/// Returns [`ReportError::Render`] only if final serialization fails; data
/// content never causes an error.
pub fn render(payload: &ReportPayload, depot_name: &str) -> Result<Vec<u8>, ReportError> {
    let mut writer = DocumentWriter::new(&format!(
        "{depot_name} {} Sales Report",
        payload.report_type.title()
    ))?;

    writer.header(payload, depot_name);
    writer.summary_boxes(payload);
    writer.period_table(&payload.reports);
    writer.product_table(&payload.product_sales);
    writer.finish()
}

/// Suggested download filename, e.g. `tirta-depot-report-daily-2025-01-10.pdf`.
#[must_use]
pub fn suggested_filename(payload: &ReportPayload) -> String {
    format!(
        "tirta-depot-report-{}-{}.pdf",
        payload.report_type,
        payload.metadata.generated_at.format("%Y-%m-%d")
    )
}

/// Truncate a product name for the table column, appending an ellipsis.
fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_MAX_CHARS {
        name.to_owned()
    } else {
        let head: String = name.chars().take(NAME_MAX_CHARS).collect();
        format!("{head}...")
    }
}

/// Stateful page writer: tracks the current page and a descending y cursor.
struct DocumentWriter {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    /// Current vertical cursor, in mm from the page bottom (printpdf origin).
    y: f64,
}

impl DocumentWriter {
    fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        Ok(Self {
            doc,
            pages: vec![(page, layer)],
            font,
            font_bold,
            y: PAGE_HEIGHT - MARGIN_TOP,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        // `pages` always holds at least the first page.
        #[allow(clippy::unwrap_used)]
        let &(page, layer) = self.pages.last().unwrap();
        self.doc.get_page(page).get_layer(layer)
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.pages.push((page, layer));
        self.y = PAGE_HEIGHT - MARGIN_TOP;
    }

    /// Break to a new page if a block of height `h` would cross the bottom
    /// margin.
    fn ensure_space(&mut self, h: f64) {
        if self.y - h < MARGIN_BOTTOM {
            self.new_page();
        }
    }

    fn text(&self, s: &str, size: f64, x: f64, y: f64, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        self.layer().use_text(s, size, Mm(x), Mm(y), font);
    }

    /// Filled rectangle with its top edge at `y_top`.
    fn rect(&self, x: f64, y_top: f64, w: f64, h: f64, color: (f64, f64, f64)) {
        let layer = self.layer();
        layer.set_fill_color(Color::Rgb(Rgb::new(color.0, color.1, color.2, None)));
        let shape = Line {
            points: vec![
                (Point::new(Mm(x), Mm(y_top)), false),
                (Point::new(Mm(x + w), Mm(y_top)), false),
                (Point::new(Mm(x + w), Mm(y_top - h)), false),
                (Point::new(Mm(x), Mm(y_top - h)), false),
            ],
            is_closed: true,
            has_fill: true,
            has_stroke: false,
            is_clipping_path: false,
        };
        layer.add_shape(shape);
        // Reset to black for subsequent text.
        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    }

    fn section_title(&mut self, title: &str) {
        self.ensure_space(ROW_HEIGHT + SECTION_GAP);
        self.text(title, 13.0, MARGIN_X, self.y, true);
        self.y -= ROW_HEIGHT;
    }

    fn placeholder_row(&mut self, message: &str) {
        self.ensure_space(ROW_HEIGHT);
        self.rect(MARGIN_X, self.y + 5.0, CONTENT_WIDTH, ROW_HEIGHT, (0.96, 0.96, 0.96));
        self.text(message, 10.0, MARGIN_X + 2.0, self.y, false);
        self.y -= ROW_HEIGHT + SECTION_GAP;
    }

    // -------------------------------------------------------------------------
    // Sections
    // -------------------------------------------------------------------------

    fn header(&mut self, payload: &ReportPayload, depot_name: &str) {
        self.text(depot_name, 20.0, MARGIN_X, self.y, true);
        self.y -= 9.0;
        self.text(
            &format!("{} Sales Report", payload.report_type.title()),
            14.0,
            MARGIN_X,
            self.y,
            false,
        );
        self.y -= 6.5;
        self.text(&payload.period, 10.0, MARGIN_X, self.y, false);
        self.y -= 5.5;
        self.text(
            &format!(
                "Generated {}",
                payload.metadata.generated_at.format("%d %b %Y %H:%M UTC")
            ),
            9.0,
            MARGIN_X,
            self.y,
            false,
        );
        self.y -= SECTION_GAP + 2.0;
    }

    fn summary_boxes(&mut self, payload: &ReportPayload) {
        const BOX_HEIGHT: f64 = 16.0;
        const BOX_GAP: f64 = 4.0;
        let box_width = (CONTENT_WIDTH - BOX_GAP) / 2.0;

        let summary = &payload.summary;
        let metrics: [(&str, String); 4] = [
            ("Total Revenue", summary.total_revenue.display()),
            ("Total Orders", summary.total_orders.to_string()),
            ("Total Items", summary.total_items.to_string()),
            ("Avg Order Value", summary.average_order_value.display()),
        ];

        // Two boxes per row.
        for row in metrics.chunks(2) {
            self.ensure_space(BOX_HEIGHT + BOX_GAP);
            for (col, (label, value)) in row.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let x = MARGIN_X + (box_width + BOX_GAP) * col as f64;
                self.rect(x, self.y, box_width, BOX_HEIGHT, (0.93, 0.96, 1.0));
                self.text(label, 8.5, x + 3.0, self.y - 5.5, false);
                self.text(value, 12.0, x + 3.0, self.y - 12.5, true);
            }
            self.y -= BOX_HEIGHT + BOX_GAP;
        }
        self.y -= SECTION_GAP - BOX_GAP;
    }

    fn period_table(&mut self, periods: &[ReportPeriod]) {
        self.section_title("Per-Period Totals");

        if periods.is_empty() {
            self.placeholder_row("No data for this range.");
            return;
        }

        let col_label = MARGIN_X + 2.0;
        let col_orders = MARGIN_X + 84.0;
        let col_items = MARGIN_X + 112.0;
        let col_revenue = MARGIN_X + 140.0;

        self.table_header_row(&[
            ("Period", col_label),
            ("Orders", col_orders),
            ("Items", col_items),
            ("Revenue", col_revenue),
        ]);

        for (i, period) in periods.iter().enumerate() {
            self.ensure_space(ROW_HEIGHT);
            if i % 2 == 1 {
                self.rect(MARGIN_X, self.y + 5.0, CONTENT_WIDTH, ROW_HEIGHT, (0.95, 0.95, 0.95));
            }
            self.text(&period.label, 9.5, col_label, self.y, false);
            self.text(&period.total_orders.to_string(), 9.5, col_orders, self.y, false);
            self.text(&period.total_items.to_string(), 9.5, col_items, self.y, false);
            self.text(&period.total_revenue.display(), 9.5, col_revenue, self.y, false);
            self.y -= ROW_HEIGHT;
        }
        self.y -= SECTION_GAP;
    }

    fn product_table(&mut self, products: &[ProductSales]) {
        self.section_title(&format!("Top {TOP_PRODUCTS} Products by Revenue"));

        if products.is_empty() {
            self.placeholder_row("No product sales in this window.");
            return;
        }

        let col_name = MARGIN_X + 2.0;
        let col_category = MARGIN_X + 72.0;
        let col_quantity = MARGIN_X + 112.0;
        let col_revenue = MARGIN_X + 140.0;

        self.table_header_row(&[
            ("Product", col_name),
            ("Category", col_category),
            ("Qty", col_quantity),
            ("Revenue", col_revenue),
        ]);

        for (i, product) in products.iter().take(TOP_PRODUCTS).enumerate() {
            self.ensure_space(ROW_HEIGHT);
            if i % 2 == 1 {
                self.rect(MARGIN_X, self.y + 5.0, CONTENT_WIDTH, ROW_HEIGHT, (0.95, 0.95, 0.95));
            }
            self.text(&truncate_name(&product.name), 9.5, col_name, self.y, false);
            self.text(product.category.label(), 9.5, col_category, self.y, false);
            self.text(&product.quantity.to_string(), 9.5, col_quantity, self.y, false);
            self.text(&product.revenue.display(), 9.5, col_revenue, self.y, false);
            self.y -= ROW_HEIGHT;
        }
        self.y -= SECTION_GAP;
    }

    fn table_header_row(&mut self, columns: &[(&str, f64)]) {
        self.ensure_space(ROW_HEIGHT);
        self.rect(MARGIN_X, self.y + 5.0, CONTENT_WIDTH, ROW_HEIGHT, (0.85, 0.89, 0.96));
        for (label, x) in columns {
            self.text(label, 9.5, *x, self.y, true);
        }
        self.y -= ROW_HEIGHT;
    }

    /// Patch "Page i of N" footers onto every page, then serialize.
    ///
    /// The total is unknown until layout finishes, so footers are written in
    /// this second pass over the buffered pages.
    fn finish(self) -> Result<Vec<u8>, ReportError> {
        let total = self.pages.len();
        for (i, &(page, layer)) in self.pages.iter().enumerate() {
            let footer = format!("Page {} of {}", i + 1, total);
            self.doc.get_page(page).get_layer(layer).use_text(
                footer,
                8.0,
                Mm(PAGE_WIDTH / 2.0 - 10.0),
                Mm(10.0),
                &self.font,
            );
        }
        self.doc
            .save_to_bytes()
            .map_err(|e| ReportError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{
        DateRange, ReportMetadata, ReportSummary, ReportType,
    };
    use chrono::{TimeZone, Utc};
    use tirta_core::{ProductCategory, Rupiah};

    fn payload_with_periods(n: usize) -> ReportPayload {
        let reports = (0..n)
            .map(|i| {
                let start = Utc
                    .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                    .single()
                    .expect("valid date")
                    + chrono::Duration::days(i64::try_from(i).expect("small index"));
                ReportPeriod {
                    label: start.format("%d %b %Y").to_string(),
                    date_range: DateRange { start, end: start + chrono::Duration::days(1) },
                    total_revenue: Rupiah::new(15_000),
                    total_items: 3,
                    total_orders: 1,
                    item_breakdown: vec![],
                }
            })
            .collect();
        ReportPayload {
            report_type: ReportType::Daily,
            period: format!("Last {n} daily"),
            reports,
            summary: ReportSummary {
                total_revenue: Rupiah::new(15_000 * n as i64),
                total_items: 3 * n as i64,
                total_orders: n as i64,
                average_order_value: Rupiah::new(15_000),
            },
            product_sales: vec![ProductSales {
                name: "Refill Gallon 19L Extra Large Family Size".to_owned(),
                quantity: 3 * n as i64,
                revenue: Rupiah::new(15_000 * n as i64),
                category: ProductCategory::Gallon,
            }],
            metadata: ReportMetadata {
                generated_at: Utc
                    .with_ymd_and_hms(2025, 1, 10, 8, 0, 0)
                    .single()
                    .expect("valid date"),
            },
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render(&payload_with_periods(7), "Tirta Depot").expect("render");
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_empty_payload_uses_placeholders() {
        let mut payload = payload_with_periods(0);
        payload.product_sales.clear();
        let bytes = render(&payload, "Tirta Depot").expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_long_report_paginates() {
        // Enough rows to force several page breaks.
        let bytes = render(&payload_with_periods(120), "Tirta Depot").expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Refill Gallon"), "Refill Gallon");
        assert_eq!(
            truncate_name("Refill Gallon 19L Extra Large Family Size"),
            "Refill Gallon 19L Ex..."
        );
    }

    #[test]
    fn test_suggested_filename() {
        let payload = payload_with_periods(1);
        assert_eq!(
            suggested_filename(&payload),
            "tirta-depot-report-daily-2025-01-10.pdf"
        );
    }
}
