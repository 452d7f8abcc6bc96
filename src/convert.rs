use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{
    codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding},
    imageops::FilterType,
    ColorType, DynamicImage, GrayImage, ImageEncoder,
};

use crate::{
    dataset::{ClassImage, ImageFolder},
    Config, Error, Reporter, Result,
};

/// Bicubic; fixed so that reruns produce identical bytes.
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::io::Reader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| Error::io(path, e))?
        .decode()
        .map_err(|source| Error::Decode { path: path.to_path_buf(), source })
}

/// Luminance first, then an exact resize. The aspect ratio is not kept.
pub fn to_grayscale_thumbnail(img: &DynamicImage, width: u32, height: u32) -> GrayImage {
    let gray = img.to_luma8();
    image::imageops::resize(&gray, width, height, RESIZE_FILTER)
}

/// Writes `img` as a binary (P5) graymap.
pub fn save_pgm(path: &Path, img: &GrayImage) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);

    PnmEncoder::new(&mut writer)
        .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::L8)
        .map_err(|source| Error::Encode { path: path.to_path_buf(), source })?;

    writer.flush().map_err(|e| Error::io(path, e))
}

/// Images written per class by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub per_class: BTreeMap<OsString, usize>,
}

impl Summary {
    fn record(&mut self, image: &ClassImage) {
        self.converted += 1;
        *self.per_class.entry(image.class_name.clone()).or_insert(0) += 1;
    }
}

pub struct Converter {
    config: Config,
    reporter: Reporter,
}

impl Converter {
    pub fn new(config: Config, reporter: Reporter) -> Self {
        Self { config, reporter }
    }

    /// Decodes, converts and writes one image, returning where it was written.
    pub fn convert_one(&self, image: &ClassImage) -> Result<PathBuf> {
        let decoded = load_image(&image.path)?;
        let thumbnail = to_grayscale_thumbnail(&decoded, self.config.width, self.config.height);

        let dir = image.output_dir(&self.config.output_dir);
        std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        let target = dir.join(image.output_file_name());
        save_pgm(&target, &thumbnail)?;
        Ok(target)
    }

    /// Converts the whole input tree. The output root is created up front, even
    /// when nothing matches. The first failure aborts the run; files written
    /// before it are left in place.
    pub fn run(&self) -> Result<Summary> {
        self.config.validate()?;

        let output_root = &self.config.output_dir;
        std::fs::create_dir_all(output_root).map_err(|e| Error::io(output_root, e))?;

        let folder = ImageFolder::scan(&self.config.input_dir, &self.config.extension)?;
        self.reporter
            .start(&self.config.input_dir, &self.config.output_dir, folder.len());

        let mut summary = Summary::default();
        for image in folder {
            let target = self.convert_one(&image)?;
            self.reporter.converted(&image.path, &target);
            summary.record(&image);
        }

        self.reporter.summary(&summary);
        Ok(summary)
    }

    /// Lists what `run` would write, without touching the output tree.
    pub fn plan(&self) -> Result<Vec<(ClassImage, PathBuf)>> {
        self.config.validate()?;

        let folder = ImageFolder::scan(&self.config.input_dir, &self.config.extension)?;
        self.reporter.scan(&folder);

        let counts: BTreeMap<OsString, usize> = folder
            .classes()
            .into_iter()
            .map(|(class, count)| (class.to_os_string(), count))
            .collect();

        let mut current_class: Option<OsString> = None;
        let mut planned = Vec::with_capacity(folder.len());
        for image in folder {
            if current_class.as_ref() != Some(&image.class_name) {
                let count = counts.get(&image.class_name).copied().unwrap_or(0);
                self.reporter.class_header(&image.class_name, count);
                current_class = Some(image.class_name.clone());
            }
            let target = image.output_path(&self.config.output_dir);
            self.reporter.planned(&image.path, &target);
            planned.push((image, target));
        }
        Ok(planned)
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
        }))
    }

    #[test]
    fn thumbnail_is_exact_size_single_channel() {
        let thumb = to_grayscale_thumbnail(&gradient(120, 45), 32, 32);
        assert_eq!(thumb.dimensions(), (32, 32));
        assert_eq!(thumb.as_raw().len(), 32 * 32);
    }

    #[test]
    fn uniform_color_stays_uniform() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 40, Rgb([200, 200, 200])));
        let thumb = to_grayscale_thumbnail(&img, 32, 32);
        let first = thumb.get_pixel(0, 0).0[0];
        assert!((199..=200).contains(&first));
        assert!(thumb.pixels().all(|p| p.0[0] == first));
    }

    #[test]
    fn pgm_header_and_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.pgm");
        let img = GrayImage::from_fn(4, 2, |x, y| image::Luma([(x + 4 * y) as u8]));

        save_pgm(&path, &img).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P5"));
        assert!(bytes.ends_with(&[0, 1, 2, 3, 4, 5, 6, 7]));

        let back = image::open(&path).unwrap();
        assert_eq!(back.color(), ColorType::L8);
        assert_eq!(back.to_luma8(), img);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        match load_image(&path) {
            Err(Error::Decode { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("unexpected result: {:?}", other.map(|i| i.color())),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_image(&dir.path().join("missing.jpg"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn plan_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("images");
        std::fs::create_dir_all(input.join("cat")).unwrap();
        gradient(10, 10).save(input.join("cat/001.jpg")).unwrap();

        let config = Config {
            input_dir: input,
            output_dir: dir.path().join("pgm_images"),
            ..Config::default()
        };
        let converter = Converter::new(config.clone(), Reporter::silent());
        let planned = converter.plan().unwrap();

        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].1, config.output_dir.join("cat").join("cat_001.pgm"));
        assert!(!config.output_dir.exists());
    }
}
