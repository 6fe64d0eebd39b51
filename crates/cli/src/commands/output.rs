//! Plain-text rendering of the page.

use std::io::{self, Write};

use shopfront_client::PageView;

/// Write the banner, the results and the cart.
pub fn write_view(out: &mut impl Write, view: &PageView) -> io::Result<()> {
    if let Some(message) = &view.message {
        writeln!(out, "[{}] {}", message.kind.as_str(), message.text)?;
    }

    if view.results.show_placeholder {
        writeln!(out, "No products found")?;
    } else if !view.results.rows.is_empty() {
        writeln!(out, "Results:")?;
        for row in &view.results.rows {
            write!(out, "  #{}  {}  {}  {}", row.id, row.name, row.price, row.stock_label)?;
            if row.disabled {
                writeln!(out)?;
            } else {
                writeln!(out, " (max {})", row.max_quantity)?;
            }
        }
    }

    if view.cart.is_empty() {
        writeln!(out, "Your cart is empty")?;
    } else {
        writeln!(out, "Cart ({} items):", view.cart.item_count)?;
        for line in &view.cart.lines {
            writeln!(out, "  {} x {}  {}", line.name, line.quantity, line.line_total)?;
        }
    }
    writeln!(out, "Total: ${}", view.cart.total)
}
