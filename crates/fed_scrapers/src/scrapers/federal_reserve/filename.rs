use chrono::NaiveDate;

const FORBIDDEN: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace every character Windows refuses in file names with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect()
}

/// `Remarks on Economic Outlook` + 2024-01-05 gives
/// `Remarks_on_Economic_Outlook_01_05_2024.txt`.
pub fn output_file_name(title: &str, date: NaiveDate) -> String {
    let stem = format!("{}_{}", sanitize_filename(title), date.format("%m_%d_%Y"));
    format!("{}.txt", stem.replace(' ', "_"))
}
