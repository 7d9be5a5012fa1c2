/// Returns a sort key that orders chromosome names karyotypically:
/// numeric (1, 2, …, 22) → X → Y → M/MT → everything else alphabetically.
pub fn chrom_karyotype_key(chr: &str) -> (u8, u32, String) {
    let bare = chr.strip_prefix("chr").unwrap_or(chr);
    match bare {
        "X" => (1, 0, String::new()),
        "Y" => (2, 0, String::new()),
        "M" | "MT" => (3, 0, String::new()),
        _ => match bare.parse::<u32>() {
            Ok(n) => (0, n, String::new()),
            Err(_) => (4, 0, bare.to_string()),
        },
    }
}

/// Sort chromosome names in place by [`chrom_karyotype_key`], falling back to
/// the full name so that `chr1` and `1` still get a stable order.
pub fn sort_chroms<S: AsRef<str>>(chroms: &mut [S]) {
    chroms.sort_by(|a, b| {
        chrom_karyotype_key(a.as_ref())
            .cmp(&chrom_karyotype_key(b.as_ref()))
            .then_with(|| a.as_ref().cmp(b.as_ref()))
    });
}
