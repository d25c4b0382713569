//! The two lookup routines compiled into the consuming program.
//!
//! `unlist(no)` returns the name of row `no`; the sentinel row yields `NULL`.
//! `unpack(name, &size, &mtime)` returns the data of the first row whose name
//! equals `name`, or `NULL`. The stored size includes the terminator, hence
//! the `- 1`. Nothing is written through the out-pointers on a miss.

use std::io::{self, Write};

const ACCESSORS: &str = "\
const char *{{prefix}}unlist(size_t no) {
  return packed_files[no].name;
}
const char *{{prefix}}unpack(const char *name, size_t *size, time_t *mtime);
const char *{{prefix}}unpack(const char *name, size_t *size, time_t *mtime) {
  const struct packed_file *p;
  for (p = packed_files; p->name != NULL; p++) {
    if (strcmp(p->name, name) != 0) continue;
    if (size != NULL) *size = p->size - 1;
    if (mtime != NULL) *mtime = p->mtime;
    return (const char *) p->data;
  }
  return NULL;
}
";

/// Render the accessor routines with `prefix` prepended to both names.
pub fn render_accessors(prefix: &str) -> String {
    ACCESSORS.replace("{{prefix}}", prefix)
}

pub fn write_accessors<W: Write + ?Sized>(out: &mut W, prefix: &str) -> io::Result<()> {
    out.write_all(render_accessors(prefix).as_bytes())
}
