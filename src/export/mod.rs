pub mod layout;
pub mod table;

pub use layout::{column_index, column_letter, plan_sheets, vendor_block, SheetPlan, VendorColumns};
pub use table::{export_to_csv, flat_table, write_csv, FlatTable};
