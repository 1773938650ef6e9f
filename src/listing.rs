//! HTML directory listing.

use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::entry::{Entry, SortKey};
use crate::format::path_links;

const HEAD: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en">
<head>
<title>Directory listing</title>
<style type="text/css">
a, a:active {text-decoration: none; color: blue;}
a:visited {color: #48468F;}
a:hover, a:focus {text-decoration: underline; color: red;}
a.header, a.header:active, a.header:visited, a.header:hover, a.header:focus {text-decoration: none; color: black;}
body {background-color: #F5F5F5;}
table {margin-left: 12px;}
th, td {font: 90% monospace; text-align: left;}
th {font-weight: bold; padding-right: 14px; padding-bottom: 3px;}
td {padding-right: 14px;}
th.size, td.size {text-align: right;}
div.list {background-color: white; border-top: 1px solid #646464; border-bottom: 1px solid #646464; padding-top: 10px; padding-bottom: 14px;}
</style>
</head>
<body>
"#;

const FOOT: &str = "</tbody>\n</table>\n</div>\n\n</body>\n</html>\n";

const SEPARATOR_ROW: &str = "<tr>\n<td colspan=\"3\">&nbsp;</td>\n</tr>\n";

/// A directory's contents, ready to render.
#[derive(Debug, Clone)]
pub struct DirListing {
    /// Breadcrumb HTML for the requested path
    pub name: String,
    pub directories: Vec<Entry>,
    pub files: Vec<Entry>,
    pub cnt_dirs: usize,
    pub cnt_files: usize,
    /// Escape directory names in links and text the same way file names are.
    /// When off, directory names are emitted raw.
    pub escape_directory_names: bool,
}

impl DirListing {
    pub fn new(url_path: &str, directories: Vec<Entry>, files: Vec<Entry>) -> Self {
        Self {
            name: path_links(url_path),
            cnt_dirs: directories.len(),
            cnt_files: files.len(),
            directories,
            files,
            escape_directory_names: true,
        }
    }

    pub fn with_escaped_directory_names(mut self, escape: bool) -> Self {
        self.escape_directory_names = escape;
        self
    }

    /// Render the complete HTML document.
    pub fn render(&self) -> Result<String, fmt::Error> {
        let mut out = String::with_capacity(
            HEAD.len() + 256 * (self.cnt_dirs + self.cnt_files + 4),
        );

        out.push_str(HEAD);
        writeln!(out, "<table cellpadding=\"0\" cellspacing=\"0\">")?;
        writeln!(out, "<tr>\n<td>")?;
        writeln!(
            out,
            "<font size=\"5\"><b>Index of: {}</b></font><br/><br/>Folders: {}&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;Files: {}<br/>",
            self.name, self.cnt_dirs, self.cnt_files
        )?;
        writeln!(out, "</td>\n</tr>\n</table>\n")?;

        writeln!(out, "<div class=\"list\">")?;
        writeln!(
            out,
            "<table summary=\"Directory Listing\" cellpadding=\"0\" cellspacing=\"0\">"
        )?;
        writeln!(out, "<thead>\n<tr>")?;
        for (class, label, key) in [
            ("name", "Name", SortKey::ByName),
            ("time", "Time", SortKey::ByTime),
            ("size", "Size", SortKey::BySize),
        ] {
            writeln!(
                out,
                "<th class=\"{class}\"><a class=\"header\" href=\"{}\">{label}</a></th>",
                key.href()
            )?;
        }
        writeln!(out, "</tr>\n</thead>\n\n<tbody>")?;

        out.push_str(SEPARATOR_ROW);
        writeln!(
            out,
            "<tr>\n<td class=\"name\"><a href=\"../\">..</a>/</td>\n<td class=\"time\"></td>\n<td class=\"size\"></td>\n</tr>"
        )?;

        for dir in &self.directories {
            let (href, text) = if self.escape_directory_names {
                (urlencoding::encode(&dir.name), escape_text(&dir.name))
            } else {
                (Cow::Borrowed(dir.name.as_str()), Cow::Borrowed(dir.name.as_str()))
            };
            write_row(&mut out, &format!("./{href}/"), &format!("{text}/"), dir)?;
        }

        if !self.files.is_empty() {
            out.push_str(SEPARATOR_ROW);
        }

        for file in &self.files {
            let href = urlencoding::encode(&file.name);
            write_row(&mut out, &href, &escape_text(&file.name), file)?;
        }

        out.push_str(FOOT);
        Ok(out)
    }
}

fn escape_text(s: &str) -> Cow<'_, str> {
    html_escape::encode_text(s)
}

fn write_row(out: &mut String, href: &str, text: &str, entry: &Entry) -> fmt::Result {
    writeln!(
        out,
        "<tr>\n<td class=\"name\"><a href=\"{href}\">{text}</a></td>\n<td class=\"time\">{} / {}</td>\n<td class=\"size\">{}</td>\n</tr>",
        entry.time, entry.time_utc, entry.size_str
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn entry(name: &str, size: u64) -> Entry {
        Entry::new(name, size, UNIX_EPOCH + Duration::from_secs(1_700_000_000))
    }

    #[test]
    fn test_render_header_counts_and_breadcrumb() {
        let listing = DirListing::new(
            "/media/",
            vec![entry("photos", 4096)],
            vec![entry("a.txt", 1), entry("b.txt", 2)],
        );
        let html = listing.render().unwrap();

        assert!(html.contains("Folders: 1&nbsp;"));
        assert!(html.contains("Files: 2<br/>"));
        assert!(html.contains("<a href=\"/media/\">media</a>"));
        assert!(html.contains("<a class=\"header\" href=\".?t\">Time</a>"));
        assert!(html.contains("<a class=\"header\" href=\".?s\">Size</a>"));
        assert!(html.contains("<a class=\"header\" href=\".\">Name</a>"));
    }

    #[test]
    fn test_render_always_has_parent_row() {
        let html = DirListing::new("/", vec![], vec![]).render().unwrap();
        assert!(html.contains("<a href=\"../\">..</a>/"));
        // Only the separator above the parent row
        assert_eq!(html.matches(SEPARATOR_ROW).count(), 1);
    }

    #[test]
    fn test_render_separator_before_files() {
        let html = DirListing::new("/", vec![entry("d", 0)], vec![entry("f", 0)])
            .render()
            .unwrap();
        assert_eq!(html.matches(SEPARATOR_ROW).count(), 2);

        let dirs_only = DirListing::new("/", vec![entry("d", 0)], vec![])
            .render()
            .unwrap();
        assert_eq!(dirs_only.matches(SEPARATOR_ROW).count(), 1);
    }

    #[test]
    fn test_render_rows_in_given_order() {
        let html = DirListing::new(
            "/",
            vec![entry("zdir", 0), entry("adir", 0)],
            vec![entry("y.bin", 2000), entry("b.bin", 10)],
        )
        .render()
        .unwrap();

        let pos = |needle: &str| html.find(needle).unwrap();
        assert!(pos("./zdir/") < pos("./adir/"));
        assert!(pos("./adir/") < pos("href=\"y.bin\""));
        assert!(pos("href=\"y.bin\"") < pos("href=\"b.bin\""));
        assert!(html.contains("<td class=\"size\">2,000</td>"));
        assert!(html.contains("2023-11-14 22:13:20 UTC"));
    }

    #[test]
    fn test_render_escapes_file_names() {
        let html = DirListing::new("/", vec![], vec![entry("a <b>&c.txt", 0)])
            .render()
            .unwrap();
        assert!(html.contains("href=\"a%20%3Cb%3E%26c.txt\""));
        assert!(html.contains(">a &lt;b&gt;&amp;c.txt</a>"));
    }

    #[test]
    fn test_render_leaves_quotes_in_text() {
        let html = DirListing::new("/", vec![], vec![entry("say \"hi\".txt", 0)])
            .render()
            .unwrap();
        assert!(html.contains("href=\"say%20%22hi%22.txt\">say \"hi\".txt</a>"));
    }

    #[test]
    fn test_render_directory_escaping_toggle() {
        let dirs = vec![entry("my <dir>", 0)];

        let escaped = DirListing::new("/", dirs.clone(), vec![]).render().unwrap();
        assert!(escaped.contains("href=\"./my%20%3Cdir%3E/\""));
        assert!(escaped.contains(">my &lt;dir&gt;/</a>"));

        let raw = DirListing::new("/", dirs, vec![])
            .with_escaped_directory_names(false)
            .render()
            .unwrap();
        assert!(raw.contains("href=\"./my <dir>/\">my <dir>/</a>"));
    }
}
