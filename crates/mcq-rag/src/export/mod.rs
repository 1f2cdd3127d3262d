//! Export of stored MCQ records

mod csv_writer;

pub use csv_writer::{
    export_filename, export_record, render_quiz_csv, render_record, CsvExport, CSV_HEADER,
};
