pub mod workbook_read;
pub mod workbook_write;
