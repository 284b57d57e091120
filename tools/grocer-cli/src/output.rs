//! Output formatting for the CLI.

use std::fmt::Display;

use console::{style, StyledObject, Term};
use grocer_catalog::prelude::*;

/// Styled terminal output, silenced in JSON mode except for errors and
/// JSON documents.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    out: Term,
    err: Term,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    fn emit(&self, term: &Term, line: impl Display) {
        if self.json {
            return;
        }
        // A closed pipe is not worth failing a command over.
        let _ = term.write_line(&line.to_string());
    }

    fn tagged(&self, term: &Term, tag: StyledObject<&str>, msg: &str) {
        self.emit(term, format!("{tag} {msg}"));
    }

    pub fn info(&self, msg: &str) {
        self.tagged(&self.out, style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.tagged(&self.out, style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        self.tagged(&self.err, style("⚠").yellow(), msg);
    }

    /// In JSON mode errors become `{"error": ...}` on stderr.
    pub fn error(&self, msg: &str) {
        if self.json {
            let _ = self
                .err
                .write_line(&serde_json::json!({ "error": msg }).to_string());
            return;
        }
        self.tagged(&self.err, style("✗").red(), &style(msg).red().to_string());
    }

    /// Only shown with `-v`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.tagged(&self.err, style("→").dim(), &style(msg).dim().to_string());
        }
    }

    pub fn header(&self, msg: &str) {
        self.emit(&self.out, format!("\n{}", style(msg).bold().underlined()));
    }

    /// Pretty JSON on stdout, printed in every mode.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(doc) = serde_json::to_string_pretty(value) {
            let _ = self.out.write_line(&doc);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        self.emit(&self.out, format!("  {}: {value}", style(key).dim()));
    }

    pub fn list_item(&self, item: &str) {
        self.tagged(&self.out, style("  •").dim(), item);
    }

    /// Left-aligned columns padded to `widths`.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        let mut line = String::from(" ");
        for (col, &width) in cols.iter().zip(widths) {
            line.push(' ');
            line.push_str(&pad(col, width));
            line.push(' ');
        }
        self.emit(&self.out, line.trim_end());
    }

    /// Print products as a table.
    pub fn product_table(&self, products: &[Product]) {
        let name_width = self.name_column_width();
        let widths = [14, name_width, 18, 10, 6, 8];
        self.table_row(&["ID", "NAME", "CATEGORY", "PRICE", "RATING", "STOCK"], &widths);
        for product in products {
            let name = truncate(&product.name, name_width);
            let price = format_price(product);
            let rating = format!("{:.1}", product.rating);
            let stock = stock_badge(product.in_stock);
            self.table_row(
                &[
                    product.id.as_str(),
                    &name,
                    product.category.as_str(),
                    &price,
                    &rating,
                    &stock,
                ],
                &widths,
            );
        }
    }

    /// Print one product's fields.
    pub fn product_details(&self, product: &Product) {
        self.kv("id", product.id.as_str());
        self.kv("name", &product.name);
        self.kv(
            "category",
            &format!("{} ({})", product.category.display_name(), product.category),
        );
        self.kv("price", &format_price(product));
        self.kv("rating", &format!("{:.1}", product.rating));
        self.kv("in stock", &stock_badge(product.in_stock));
        if !product.image.is_empty() {
            self.kv("image", &product.image);
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    fn name_column_width(&self) -> usize {
        // Every other column plus separators takes 66 characters.
        let (_, cols) = self.out.size();
        usize::from(cols).saturating_sub(66).clamp(16, 48)
    }
}

/// Price with the discount applied, showing the list price when discounted.
pub fn format_price(product: &Product) -> String {
    if product.has_discount() {
        format!(
            "₹{:.2} ({}% off ₹{:.2})",
            product.discounted_price(),
            product.discount,
            product.price
        )
    } else {
        format!("₹{:.2}", product.price)
    }
}

/// Colored stock indicator.
pub fn stock_badge(in_stock: bool) -> String {
    if in_stock {
        style("yes").green().to_string()
    } else {
        style("no").red().to_string()
    }
}

/// Pad to `width` display columns; styled text keeps its escape codes.
fn pad(text: &str, width: usize) -> String {
    console::pad_str(text, width, console::Alignment::Left, None).into_owned()
}

/// Cut `text` to at most `width` characters, marking the cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
