use crate::Error;

/// Converts a finished SVG document to PDF bytes.
pub fn from_svg(svg: &str) -> Result<Vec<u8>, Error> {
  let options = svg2pdf::usvg::Options::default();
  let tree = svg2pdf::usvg::Tree::from_str(svg, &options).map_err(|_| Error::RenderFailure)?;
  svg2pdf::to_pdf(
    &tree,
    svg2pdf::ConversionOptions::default(),
    svg2pdf::PageOptions::default(),
  )
  .map_err(|_| Error::RenderFailure)
}
