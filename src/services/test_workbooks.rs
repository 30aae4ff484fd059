//! In-memory xlsx documents shaped like the published price sheet.

use rust_xlsxwriter::Workbook;

const NAME_COL: u16 = 1; // B
const PRICE_COL: u16 = 6; // G

#[derive(Debug, Clone)]
pub enum PriceCell {
    Number(f64),
    Text(String),
    Blank,
}

#[derive(Debug, Clone)]
pub struct SheetFixture {
    name: String,
    rows: Vec<(u32, Option<String>, PriceCell)>,
}

impl SheetFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// `row` is the 1-based spreadsheet row.
    pub fn row(self, row: u32, name: &str, price: f64) -> Self {
        self.cells(row, Some(name), PriceCell::Number(price))
    }

    pub fn cells(mut self, row: u32, name: Option<&str>, price: PriceCell) -> Self {
        self.rows.push((row, name.map(str::to_string), price));
        self
    }
}

pub fn build_workbook(sheets: &[SheetFixture]) -> Vec<u8> {
    let mut workbook = Workbook::new();

    for fixture in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(fixture.name.as_str()).unwrap();
        sheet.write_string(0, 0, "野菜価格一覧").unwrap();
        sheet.write_string(5, NAME_COL, "品目").unwrap();
        sheet.write_string(5, PRICE_COL, "価格").unwrap();

        for (row, name, price) in &fixture.rows {
            let r = row - 1;
            // an empty name is just a blank cell
            if let Some(name) = name.as_deref().filter(|n| !n.is_empty()) {
                sheet.write_string(r, NAME_COL, name).unwrap();
            }
            match price {
                PriceCell::Number(v) => {
                    sheet.write_number(r, PRICE_COL, *v).unwrap();
                }
                PriceCell::Text(t) => {
                    sheet.write_string(r, PRICE_COL, t.as_str()).unwrap();
                }
                PriceCell::Blank => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}
