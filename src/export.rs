//! Excel and PDF export of period reports.

use crate::error::{AppError, Result};
use crate::report::{ReportRow, paid_total};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Format whole rupiah with Indonesian thousands separators: `Rp 1.500.000`.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("Rp -{grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Download filename for a period report.
pub fn export_filename(bulan: &str, tahun: i32, extension: &str) -> String {
    format!("laporan_{bulan}_{tahun}.{extension}")
}

/// Export a period report to an in-memory xlsx workbook.
pub fn export_report_to_excel(rows: &[ReportRow]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Laporan SPP")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    let amount_format = Format::new().set_num_format("#,##0");

    let headers = ["NIS", "Nama", "Kelas", "Bulan", "Tahun", "Jumlah", "Status"];

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    worksheet.set_column_width(0, 14)?; // NIS
    worksheet.set_column_width(1, 30)?; // Nama
    worksheet.set_column_width(2, 10)?; // Kelas
    worksheet.set_column_width(3, 12)?; // Bulan
    worksheet.set_column_width(4, 8)?; // Tahun
    worksheet.set_column_width(5, 14)?; // Jumlah
    worksheet.set_column_width(6, 22)?; // Status

    for (idx, row) in rows.iter().enumerate() {
        let r = (idx + 1) as u32;

        worksheet.write_string(r, 0, &row.nis)?;
        worksheet.write_string(r, 1, &row.nama)?;
        worksheet.write_string(r, 2, &row.kelas)?;
        worksheet.write_string(r, 3, &row.bulan)?;
        worksheet.write_number(r, 4, row.tahun)?;
        worksheet.write_number_with_format(r, 5, row.jumlah as f64, &amount_format)?;
        worksheet.write_string(r, 6, row.status.as_str().to_uppercase())?;
    }

    if !rows.is_empty() {
        let last_row = rows.len() as u32;
        worksheet.autofilter(0, 0, last_row, 6)?;
    }

    worksheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const ROW_HEIGHT: f32 = 7.0;
const BOTTOM_MARGIN: f32 = 20.0;
/// Left edge of each table column in mm: No, NIS, Nama, Kelas, Jumlah, Status.
const COLUMNS: [f32; 6] = [15.0, 27.0, 55.0, 118.0, 142.0, 172.0];
const NAME_MAX_CHARS: usize = 32;

/// Export a period report to a PDF document.
pub fn export_report_to_pdf(rows: &[ReportRow], bulan: &str, tahun: i32, school_name: &str) -> Result<Vec<u8>> {
    let title = format!("Laporan Pembayaran SPP {bulan} {tahun}");
    let (doc, page, layer) = PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::export(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::export(e.to_string()))?;

    let mut layer = doc.get_page(page).get_layer(layer);

    layer.use_text("Laporan Pembayaran SPP", 16.0, Mm(COLUMNS[0]), Mm(280.0), &bold);
    layer.use_text(format!("{bulan} {tahun}"), 12.0, Mm(COLUMNS[0]), Mm(272.0), &regular);
    layer.use_text(school_name, 12.0, Mm(COLUMNS[0]), Mm(265.0), &regular);

    let mut y = 252.0;
    write_header(&layer, y, &bold);
    y -= ROW_HEIGHT;

    for (idx, row) in rows.iter().enumerate() {
        if y < BOTTOM_MARGIN {
            let (next_page, next_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT - BOTTOM_MARGIN;
            write_header(&layer, y, &bold);
            y -= ROW_HEIGHT;
        }

        let cells = [
            (idx + 1).to_string(),
            row.nis.clone(),
            truncate(&row.nama, NAME_MAX_CHARS),
            row.kelas.clone(),
            format_rupiah(row.jumlah),
            row.status.as_str().to_uppercase(),
        ];
        for (x, cell) in COLUMNS.iter().zip(cells) {
            layer.use_text(cell, 9.0, Mm(*x), Mm(y), &regular);
        }
        y -= ROW_HEIGHT;
    }

    if y < BOTTOM_MARGIN {
        let (next_page, next_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        layer = doc.get_page(next_page).get_layer(next_layer);
        y = PAGE_HEIGHT - BOTTOM_MARGIN;
    }
    layer.use_text(
        format!("Total: {}", format_rupiah(paid_total(rows))),
        10.0,
        Mm(COLUMNS[4]),
        Mm(y - 2.0),
        &bold,
    );

    doc.save_to_bytes().map_err(|e| AppError::export(e.to_string()))
}

fn write_header(layer: &PdfLayerReference, y: f32, font: &IndirectFontRef) {
    let headers = ["No", "NIS", "Nama", "Kelas", "Jumlah", "Status"];
    for (x, header) in COLUMNS.iter().zip(headers) {
        layer.use_text(header, 10.0, Mm(*x), Mm(y), font);
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars - 3).collect();
        cut.push_str("...");
        cut
    }
}
