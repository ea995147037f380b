//! Table Demo - Page Objects over a Sectioned Table
//!
//! Builds the selectors a page object would use to read rows from the first
//! section of a table, then compiles them for a driver.
//!
//! # Running
//!
//! ```bash
//! cargo run --example table_demo -p locus
//! ```

#![allow(clippy::unwrap_used)]

use locus::prelude::*;

fn main() {
    println!("=== Locus Table Demo ===\n");

    demo_xpath_sections();
    demo_css_form();
    demo_queries();
    demo_validation();

    println!("\n=== Table Demo Complete ===");
}

fn demo_xpath_sections() {
    println!("--- XPath: rows before a marker ---");

    let marker = xpath().page("tr", id_is("marker"));
    let rows = xpath()
        .page("table", id_is("outer-table-1"))
        .descendant("tr", ())
        .limited_by(&marker);
    let first_cell = xpath().child("td", first());

    println!("  marker:     {}", marker.render().unwrap());
    println!("  rows:       {}", rows.render().unwrap());
    println!("  first cell: {} (absolute: {})", first_cell.render().unwrap(), first_cell.is_absolute());
}

fn demo_css_form() {
    println!("\n--- CSS: login form ---");

    let form = css().page().descendant("form", id_is("login"));
    let user = form.descendant("input", name_attr().is("user"));
    let submit = form.child("button", (type_attr().is("submit"), not(css_classes(["disabled"]))));

    println!("  user:   {}", user.render().unwrap());
    println!("  submit: {}", submit.render().unwrap());
}

fn demo_queries() {
    println!("\n--- Queries for a CDP driver ---");

    let cell = xpath().child("td", text().contains("Total"));
    let query = Query::compile(&cell).unwrap();
    println!("  scoped text: {}", query.scoped_text());
    println!("  count js:    {}", query.to_scoped_count_query("row"));
}

fn demo_validation() {
    println!("\n--- Validation ---");

    let loose = xpath().page(ANY, ());
    match loose.render() {
        Ok(text) => println!("  unexpected: {text}"),
        Err(e) => println!("  rejected: {e}"),
    }
}
