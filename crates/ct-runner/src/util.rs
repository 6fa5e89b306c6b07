/// Split `"1, 2,3"` style id lists. Blank entries are dropped.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Rupee amount with Indian digit grouping: `₹12,34,567`.
pub fn format_inr(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }
    let (head, last3) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (h, t) = rest.split_at(rest.len() - 2);
        groups.push(t);
        rest = h;
    }
    groups.push(rest);
    groups.reverse();
    format!("₹{},{}", groups.join(","), last3)
}
