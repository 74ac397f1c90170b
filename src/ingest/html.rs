//! Text extraction from saved academic-records pages
//!
//! The pages are loosely structured, so this reads them by scanning tag
//! blocks rather than building a DOM: the first `<tbody>` holds the
//! curriculum table, and the course title sits in the first `<small>`.

/// Finds the next `<tag ...>...</tag>` block at or after `from`
///
/// Returns the byte range of the whole block. Matching is ASCII
/// case-insensitive; `lower` must be `html.to_ascii_lowercase()`.
fn next_block(html: &str, lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let mut search = from;
    loop {
        let start = lower.get(search..)?.find(&open)? + search;
        let after = start + open.len();
        // Reject longer tag names sharing the prefix (`<trx`, `<tdata`)
        match lower.as_bytes().get(after) {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/') => {}
            _ => {
                search = after;
                continue;
            }
        }

        let open_end = html[start..].find('>')? + start + 1;
        // Self-closing (`<td/>`): an empty block with no closing tag
        if html[..open_end].ends_with("/>") {
            return Some((start, open_end));
        }
        let end = lower[open_end..].find(&close)? + open_end + close.len();
        return Some((start, end));
    }
}

/// Returns the content between the opening tag's `>` and the closing tag
fn inner(block: &str) -> &str {
    match (block.find('>'), block.rfind('<')) {
        (Some(open_end), Some(close_start)) if close_start > open_end => {
            &block[open_end + 1..close_start]
        }
        _ => "",
    }
}

/// Iterates the inner text of every `<tag>` block in `html`
fn blocks<'a>(html: &'a str, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let lower = html.to_ascii_lowercase();
    let mut pos = 0;
    std::iter::from_fn(move || {
        let (start, end) = next_block(html, &lower, tag, pos)?;
        pos = end;
        Some(inner(&html[start..end]))
    })
}

/// Removes markup, decodes the common entities and collapses whitespace
pub fn cell_text(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;

    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            // Tags separate words (`Cálculo<br>I`)
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts the rows of the curriculum table, in document order
///
/// Reads the first `<tbody>`, or the whole document if there is none. Each
/// `<tr>` yields its `<td>` cell texts; header cells (`<th>`) are ignored, so
/// header rows come out short and are treated as decoration downstream.
pub fn table_rows(html: &str) -> Vec<Vec<String>> {
    let body = blocks(html, "tbody").next().unwrap_or(html);

    blocks(body, "tr")
        .map(|tr| blocks(tr, "td").map(cell_text).collect())
        .collect()
}

/// Extracts the course name from the course view page
///
/// The title is the first `<small>` element, prefixed by two words of
/// labelling (`Curso: 1906 Ciência da Computação` style); those are dropped.
pub fn course_title(html: &str) -> Option<String> {
    let small = blocks(html, "small").next()?;
    let text = cell_text(small);
    let title = text.split_whitespace().skip(2).collect::<Vec<_>>().join(" ");

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r##"
<html><body>
<table class="table">
  <thead><tr><th>Disciplina</th><th>CH</th><th>Pré-requisito</th></tr></thead>
  <TBODY>
    <tr><td colspan="3"><b>1º Semestre</b></td></tr>
    <tr>
      <td>Cálculo   I (OBR)</td>
      <td>60h</td>
      <td>Nenhum</td>
    </tr>
    <tr><td>Cálculo II (OPT)</td><td>60h</td><td><a href="#">Cálculo I</a></td></tr>
    <tr><td></td><td></td></tr>
  </TBODY>
</table>
</body></html>
"##;

    #[test]
    fn extracts_rows_in_order() {
        let rows = table_rows(TABLE);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["1º Semestre"]);
        assert_eq!(rows[1], vec!["Cálculo I (OBR)", "60h", "Nenhum"]);
        assert_eq!(rows[2], vec!["Cálculo II (OPT)", "60h", "Cálculo I"]);
        assert_eq!(rows[3], vec!["", ""]);
    }

    #[test]
    fn header_rows_outside_tbody_are_ignored() {
        let rows = table_rows(TABLE);
        assert!(rows.iter().all(|r| r.first().map(String::as_str) != Some("Disciplina")));
    }

    #[test]
    fn document_without_tbody() {
        let html = "<table><tr><td>A (OPT)</td><td>34h</td><td>Nenhum</td></tr></table>";
        assert_eq!(table_rows(html), vec![vec!["A (OPT)", "34h", "Nenhum"]]);
    }

    #[test]
    fn similar_tag_names_do_not_match() {
        let html = "<tbody><track></track><tr><td>A</td><tdata>x</tdata></tr></tbody>";
        assert_eq!(table_rows(html), vec![vec!["A"]]);
    }

    #[test]
    fn self_closing_cell_is_empty() {
        let html = "<tr><td/><td>60h</td><td />Nenhum<td>Cálculo I</td></tr>";
        assert_eq!(table_rows(html), vec![vec!["", "60h", "", "Cálculo I"]]);
    }

    #[test]
    fn cell_text_decodes_entities() {
        assert_eq!(cell_text("Banco&nbsp;de&nbsp;Dados&amp;SQL"), "Banco de Dados&SQL");
        assert_eq!(cell_text("Cálculo<br>I"), "Cálculo I");
    }

    #[test]
    fn course_title_drops_label() {
        let html = "<h1>Curso <small>Curso: 1906   Ciência da\n Computação</small></h1>";
        assert_eq!(course_title(html).as_deref(), Some("Ciência da Computação"));
    }

    #[test]
    fn course_title_missing() {
        assert_eq!(course_title("<h1>Nothing here</h1>"), None);
        assert_eq!(course_title("<small>Curso: 1906</small>"), None);
    }
}
