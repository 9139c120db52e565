/// Pulls the `filename` parameter out of a `Content-Disposition` header value.
///
/// Only the plain `filename=` form is handled; surrounding quotes are
/// stripped and any directory components are dropped so the result can be
/// joined onto a download directory safely.
pub fn attachment_filename(header: &str) -> Option<String> {
    let value = header
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("filename="))?;

    let value = value.trim().trim_matches('"');
    let name = value.rsplit(['/', '\\']).next().unwrap_or(value).trim();

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::attachment_filename;

    #[test]
    fn reads_quoted_and_bare_names() {
        assert_eq!(
            attachment_filename("attachment; filename=\"Payables_Summary_2024.xlsx\"").as_deref(),
            Some("Payables_Summary_2024.xlsx")
        );
        assert_eq!(
            attachment_filename("attachment; filename=report.xlsx").as_deref(),
            Some("report.xlsx")
        );
    }

    #[test]
    fn ignores_filename_star_and_missing_names() {
        assert_eq!(attachment_filename("attachment"), None);
        assert_eq!(attachment_filename("attachment; filename*=UTF-8''x.xlsx"), None);
        assert_eq!(attachment_filename("attachment; filename=\"\""), None);
    }

    #[test]
    fn strips_directory_components() {
        assert_eq!(
            attachment_filename("attachment; filename=\"../../etc/passwd\"").as_deref(),
            Some("passwd")
        );
    }
}
