use std::fs;
use std::path::{Path, PathBuf};

/// Minimal but well-formed 24-bit BMP bytes that `imagesize` can probe.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// One image of a category fixture: basename, dimensions, and CSV rows
/// (in `#item,x,y,width,height,label` order, header excluded).
pub struct FixtureImage {
    pub stem: &'static str,
    pub width: u32,
    pub height: u32,
    pub rows: &'static [&'static str],
}

/// Builds a standard category layout under `root`:
/// `<category>/{images,csv,sets}` with BMP images named `<stem>.bmp`.
///
/// The split file lists the images in the order given, which fixes ID
/// assignment for the tests.
pub fn build_category_fixture(
    root: &Path,
    category: &str,
    split: &str,
    images: &[FixtureImage],
) -> PathBuf {
    let category_root = root.join(category);
    let images_dir = category_root.join("images");
    let csv_dir = category_root.join("csv");
    let sets_dir = category_root.join("sets");
    for dir in [&images_dir, &csv_dir, &sets_dir] {
        fs::create_dir_all(dir).expect("create fixture dir");
    }

    let mut split_lines = String::new();
    for image in images {
        write_bmp(&images_dir.join(format!("{}.bmp", image.stem)), image.width, image.height);

        let mut csv = String::from("#item,x,y,width,height,label\n");
        for row in image.rows {
            csv.push_str(row);
            csv.push('\n');
        }
        fs::write(csv_dir.join(format!("{}.csv", image.stem)), csv).expect("write fixture csv");

        split_lines.push_str(image.stem);
        split_lines.push('\n');
    }
    fs::write(sets_dir.join(format!("{split}.txt")), split_lines).expect("write split file");

    category_root
}
