//! Fixture catalog: expands the size/quality matrix into a plan of files and
//! writes them under a fixtures root.
//!
//! Layout:
//!
//! ```text
//! <root>/images/<family>/<size>_<format>[_<variant>].<ext>
//! <root>/meshes/<family>/<name>.<ext>
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "threads")]
use rayon::prelude::*;

use crate::config::{FixtureConfig, QualityLevel, SizeClass};
use crate::formats::{CodecRequest, ImageFormat, MeshFormat, MeshRequest, RasterRequest, SvgTemplate};
use crate::image::pattern::{shift_channels, synthesize, with_radial_alpha, Pattern};
use crate::image::{encode_raster, ImageCrateCodec, RasterCodec, TgaBitDepth};
use crate::mesh::geometry;
use crate::mesh::gltf::GltfOptions;
use crate::mesh::ply::PlyOptions;
use crate::mesh::stl::StlOptions;
use crate::mesh::{encode_mesh, MeshOutput};
use crate::types::{FixtureError, FixtureResult, Mesh, PixelBuffer};
#[cfg(not(feature = "threads"))]
use crate::user_feedback::UserFeedback;

pub const IMAGES_DIR: &str = "images";
pub const MESHES_DIR: &str = "meshes";

/// Icon sides written as standalone `.ico` files
pub const ICO_SIDES: [u32; 5] = [16, 32, 48, 64, 128];
/// How many of [`ICO_SIDES`] go into `multi_size.ico`
const MULTI_ICO_ENTRIES: usize = 4;

const ANIMATION_FRAMES: usize = 8;
const ANIMATION_DELAY_MS: u32 = 200;
/// Channel rotation added per animation frame
const ANIMATION_SHIFT_STEP: usize = 10;
const PLAIN_JPEG_QUALITY: u8 = 75;
const PLAIN_WEBP_QUALITY: u8 = 80;

/// Pixels fed to a raster encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Pattern { width: u32, height: u32, pattern: Pattern },
    /// Gradient with a radial alpha hole
    Transparent { width: u32, height: u32 },
    /// Gradient frames, each channel-shifted further than the last
    Animation { width: u32, height: u32, frames: usize },
    /// One square geometric image per side
    Icons { sides: Vec<u32>, seed: u64 },
}

impl ImageSource {
    pub fn render(&self) -> FixtureResult<Vec<PixelBuffer>> {
        match self {
            Self::Pattern { width, height, pattern } => Ok(vec![synthesize(*width, *height, *pattern)?]),
            Self::Transparent { width, height } => {
                let base = synthesize(*width, *height, Pattern::Gradient)?;
                Ok(vec![with_radial_alpha(&base)?])
            }
            Self::Animation { width, height, frames } => {
                let base = synthesize(*width, *height, Pattern::Gradient)?;
                (0..*frames).map(|i| shift_channels(&base, i * ANIMATION_SHIFT_STEP)).collect()
            }
            Self::Icons { sides, seed } => sides
                .iter()
                .map(|&side| synthesize(side, side, Pattern::Geometric { seed: *seed }))
                .collect(),
        }
    }
}

/// Geometry fed to a mesh encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Cube,
    Icosphere { level: u32 },
    Grid { size: u32 },
    TriangleRing { triangles: u32 },
    PointRing { points: u32 },
    SimpleTriangle,
    SimpleQuad,
}

impl Primitive {
    pub fn build(self, seed: u64) -> FixtureResult<Mesh> {
        match self {
            Self::Cube => Ok(geometry::cube()),
            Self::Icosphere { level } => Ok(geometry::icosphere(level)),
            Self::Grid { size } => geometry::grid(size),
            Self::TriangleRing { triangles } => geometry::triangle_ring(triangles),
            Self::PointRing { points } => geometry::point_ring(points, seed),
            Self::SimpleTriangle => Ok(geometry::simple_triangle()),
            Self::SimpleQuad => Ok(geometry::simple_quad()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixtureJob {
    Raster { source: ImageSource, request: RasterRequest },
    Mesh { primitive: Primitive, request: MeshRequest },
}

/// One planned fixture, relative to the catalog root
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureEntry {
    pub path: PathBuf,
    pub family: &'static str,
    pub job: FixtureJob,
}

impl FixtureEntry {
    fn image(format: ImageFormat, file: String, source: ImageSource, request: RasterRequest) -> Self {
        Self {
            path: Path::new(IMAGES_DIR).join(format.family()).join(file),
            family: format.family(),
            job: FixtureJob::Raster { source, request },
        }
    }

    fn mesh(format: MeshFormat, name: &str, primitive: Primitive, request: MeshRequest) -> Self {
        Self {
            path: Path::new(MESHES_DIR)
                .join(format.extension())
                .join(format!("{name}.{}", format.extension())),
            family: format.extension(),
            job: FixtureJob::Mesh { primitive, request },
        }
    }

    /// Every path this entry writes; glTF also writes its `.bin`
    pub fn outputs(&self) -> Vec<PathBuf> {
        match &self.job {
            FixtureJob::Mesh { request: MeshRequest::Gltf(options), .. } => {
                vec![self.path.clone(), self.path.with_file_name(&options.buffer_uri)]
            }
            _ => vec![self.path.clone()],
        }
    }
}

/// A file the catalog wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Relative to the catalog root
    pub path: PathBuf,
    pub family: &'static str,
    pub bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogReport {
    pub root: PathBuf,
    pub files: Vec<WrittenFile>,
}

impl CatalogReport {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes).sum()
    }

    pub fn family_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for file in &self.files {
            *counts.entry(file.family).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> String {
        let families: Vec<String> = self
            .family_counts()
            .iter()
            .map(|(family, count)| format!("{family}={count}"))
            .collect();
        format!(
            "{} files, {} bytes under {} ({})",
            self.file_count(),
            self.total_bytes(),
            self.root.display(),
            families.join(", ")
        )
    }
}

/// Runs a [`FixtureConfig`] against a raster codec
pub struct FixtureCatalog {
    config: FixtureConfig,
    codec: Box<dyn RasterCodec>,
}

impl std::fmt::Debug for FixtureCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureCatalog").field("config", &self.config).finish_non_exhaustive()
    }
}

impl FixtureCatalog {
    pub fn new(config: FixtureConfig) -> FixtureResult<Self> {
        Self::with_codec(config, ImageCrateCodec)
    }

    pub fn with_codec(config: FixtureConfig, codec: impl RasterCodec + 'static) -> FixtureResult<Self> {
        config.validate()?;
        Ok(Self { config, codec: Box::new(codec) })
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Expand the configuration into entries. Output paths are unique.
    pub fn plan(&self) -> FixtureResult<Vec<FixtureEntry>> {
        let mut entries = Vec::new();
        for &format in &self.config.image_formats {
            self.plan_images(format, &mut entries);
        }
        for &format in &self.config.mesh_formats {
            plan_meshes(format, &mut entries);
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            for path in entry.outputs() {
                if !seen.insert(path.clone()) {
                    return Err(FixtureError::Config(format!("fixture path {} planned twice", path.display())));
                }
            }
        }
        Ok(entries)
    }

    /// Sizes from the configured table that `format` is produced at
    fn sizes_for(&self, format: ImageFormat) -> impl Iterator<Item = (SizeClass, u32, u32)> + '_ {
        self.config
            .sizes
            .iter()
            .filter(move |s| produced_at(format, s.class))
            .map(|s| (s.class, s.width, s.height))
    }

    fn plan_images(&self, format: ImageFormat, entries: &mut Vec<FixtureEntry>) {
        let seed = self.config.seed;
        let geometric = Pattern::Geometric { seed };

        if format == ImageFormat::Ico {
            for side in ICO_SIDES {
                entries.push(FixtureEntry::image(
                    format,
                    format!("{side}x{side}.ico"),
                    ImageSource::Icons { sides: vec![side], seed },
                    CodecRequest::Ico.into(),
                ));
            }
            entries.push(FixtureEntry::image(
                format,
                "multi_size.ico".to_string(),
                ImageSource::Icons { sides: ICO_SIDES[..MULTI_ICO_ENTRIES].to_vec(), seed },
                CodecRequest::Ico.into(),
            ));
            return;
        }

        for (class, width, height) in self.sizes_for(format) {
            let s = class.name();
            let pattern = |kind: Pattern| ImageSource::Pattern { width, height, pattern: kind };
            let mut push = |file: String, source: ImageSource, request: RasterRequest| {
                entries.push(FixtureEntry::image(format, file, source, request));
            };

            match format {
                ImageFormat::Png => {
                    push(format!("{s}_png.png"), pattern(Pattern::Gradient), CodecRequest::Png.into());
                    push(
                        format!("{s}_png_transparent.png"),
                        ImageSource::Transparent { width, height },
                        CodecRequest::Png.into(),
                    );
                    push(format!("{s}_png_lossless.png"), pattern(Pattern::Gradient), CodecRequest::Png.into());
                }
                ImageFormat::Jpeg => {
                    for entry in &self.config.qualities {
                        let Some(quality) = entry.quality else { continue };
                        push(
                            format!("{s}_jpeg_{}.jpg", entry.level.name()),
                            pattern(geometric),
                            CodecRequest::Jpeg { quality }.into(),
                        );
                    }
                    let plain = self.config.quality(QualityLevel::Medium).flatten().unwrap_or(PLAIN_JPEG_QUALITY);
                    push(format!("{s}_jpeg.jpg"), pattern(geometric), CodecRequest::Jpeg { quality: plain }.into());
                }
                ImageFormat::WebP => {
                    for entry in &self.config.qualities {
                        push(
                            format!("{s}_webp_{}.webp", entry.level.name()),
                            pattern(Pattern::Checkerboard),
                            CodecRequest::WebP { quality: entry.quality }.into(),
                        );
                    }
                    push(
                        format!("{s}_webp.webp"),
                        pattern(Pattern::Checkerboard),
                        CodecRequest::WebP { quality: Some(PLAIN_WEBP_QUALITY) }.into(),
                    );
                }
                ImageFormat::Gif => {
                    push(format!("{s}_gif.gif"), pattern(geometric), CodecRequest::Gif.into());
                    push(
                        format!("{s}_gif_animated.gif"),
                        ImageSource::Animation { width, height, frames: ANIMATION_FRAMES },
                        CodecRequest::AnimatedGif { delay_ms: ANIMATION_DELAY_MS, loop_count: 0 }.into(),
                    );
                }
                ImageFormat::Bmp => {
                    push(format!("{s}_bmp.bmp"), pattern(geometric), CodecRequest::Bmp.into());
                }
                ImageFormat::Tiff => {
                    let gradient = pattern(Pattern::Gradient);
                    push(format!("{s}_tiff.tiff"), gradient.clone(), CodecRequest::Tiff { lzw: false }.into());
                    push(format!("{s}_tif.tif"), gradient.clone(), CodecRequest::Tiff { lzw: false }.into());
                    push(format!("{s}_tiff_lzw.tiff"), gradient, CodecRequest::Tiff { lzw: true }.into());
                }
                ImageFormat::Svg => {
                    for template in [SvgTemplate::Simple, SvgTemplate::Complex] {
                        push(
                            format!("{s}_{}.svg", template.name()),
                            pattern(Pattern::Gradient),
                            CodecRequest::Svg(template).into(),
                        );
                    }
                }
                ImageFormat::Tga => {
                    let gradient = pattern(Pattern::Gradient);
                    for (suffix, depth) in [
                        ("_24bit", TgaBitDepth::Bpp24),
                        ("_32bit", TgaBitDepth::Bpp32),
                        ("_16bit", TgaBitDepth::Bpp16),
                        ("", TgaBitDepth::Bpp24),
                    ] {
                        push(format!("{s}_tga{suffix}.tga"), gradient.clone(), RasterRequest::Tga(depth));
                    }
                }
                ImageFormat::Ico => {}
            }
        }
    }

    /// Write every planned fixture under `root`
    pub fn generate(&self, root: &Path) -> FixtureResult<CatalogReport> {
        let plan = self.plan()?;
        tracing::info!("Generating {} fixtures under {}", plan.len(), root.display());

        let batches = self.produce_all(root, &plan)?;
        let report = CatalogReport { root: root.to_path_buf(), files: batches.into_iter().flatten().collect() };

        for (family, count) in report.family_counts() {
            tracing::info!("{}: {} files", family, count);
        }
        tracing::info!("Catalog complete: {}", report.summary());
        Ok(report)
    }

    #[cfg(feature = "threads")]
    fn produce_all(&self, root: &Path, plan: &[FixtureEntry]) -> FixtureResult<Vec<Vec<WrittenFile>>> {
        if self.config.parallel {
            plan.par_iter().map(|entry| self.produce(root, entry)).collect()
        } else {
            plan.iter().map(|entry| self.produce(root, entry)).collect()
        }
    }

    #[cfg(not(feature = "threads"))]
    fn produce_all(&self, root: &Path, plan: &[FixtureEntry]) -> FixtureResult<Vec<Vec<WrittenFile>>> {
        if self.config.parallel {
            UserFeedback::show_warning("parallel generation requested without the threads feature, running sequentially");
        }
        plan.iter().map(|entry| self.produce(root, entry)).collect()
    }

    /// Encode one entry and write its output files
    pub fn produce(&self, root: &Path, entry: &FixtureEntry) -> FixtureResult<Vec<WrittenFile>> {
        let outputs = match &entry.job {
            FixtureJob::Raster { source, request } => {
                let frames = source.render()?;
                vec![(entry.path.clone(), encode_raster(self.codec.as_ref(), &frames, request)?)]
            }
            FixtureJob::Mesh { primitive, request } => {
                let mesh = primitive.build(self.config.seed)?;
                let output = encode_mesh(&mesh, request)?;
                tracing::debug!(
                    "{}: {} vertices, {} faces, {} bytes",
                    entry.path.display(),
                    mesh.vertex_count(),
                    mesh.face_count(),
                    output.total_len()
                );
                match output {
                    MeshOutput::Single(bytes) => vec![(entry.path.clone(), bytes)],
                    MeshOutput::Gltf(pair) => {
                        let paths = entry.outputs();
                        vec![(paths[0].clone(), pair.json), (paths[1].clone(), pair.bin)]
                    }
                }
            }
        };

        outputs
            .into_iter()
            .map(|(relative, bytes)| {
                write_file(&root.join(&relative), &bytes)?;
                tracing::debug!("wrote {} ({} bytes)", relative.display(), bytes.len());
                Ok(WrittenFile { path: relative, family: entry.family, bytes: bytes.len() })
            })
            .collect()
    }
}

/// Size tiers each image family is produced at
pub const fn produced_at(format: ImageFormat, class: SizeClass) -> bool {
    match format {
        ImageFormat::Png | ImageFormat::Jpeg => !matches!(class, SizeClass::Tiny),
        ImageFormat::Gif => matches!(class, SizeClass::Tiny | SizeClass::Small | SizeClass::Medium),
        ImageFormat::Bmp | ImageFormat::Tga => !matches!(class, SizeClass::Ultra),
        ImageFormat::WebP | ImageFormat::Tiff | ImageFormat::Svg => true,
        ImageFormat::Ico => false,
    }
}

fn plan_meshes(format: MeshFormat, entries: &mut Vec<FixtureEntry>) {
    let binary_stl = |triangles| {
        (Primitive::TriangleRing { triangles }, MeshRequest::Stl(StlOptions::default()))
    };
    let binary_ply = |points| (Primitive::PointRing { points }, MeshRequest::Ply(PlyOptions::default()));

    let jobs: Vec<(&str, Primitive, MeshRequest)> = match format {
        MeshFormat::Obj => vec![
            ("simple_cube", Primitive::Cube, MeshRequest::Obj { comment: Some("Simple Cube".to_string()) }),
            (
                "medium_sphere",
                Primitive::Icosphere { level: 2 },
                MeshRequest::Obj { comment: Some("Sphere with 2 subdivisions".to_string()) },
            ),
            (
                "complex_sphere",
                Primitive::Icosphere { level: 4 },
                MeshRequest::Obj { comment: Some("Sphere with 4 subdivisions".to_string()) },
            ),
            (
                "large_grid",
                Primitive::Grid { size: 50 },
                MeshRequest::Obj { comment: Some("Grid mesh 50x50".to_string()) },
            ),
        ],
        MeshFormat::Stl => {
            let (small, small_req) = binary_stl(12);
            let (medium, medium_req) = binary_stl(100);
            let (large, large_req) = binary_stl(1000);
            vec![
                (
                    "simple_ascii",
                    Primitive::Cube,
                    MeshRequest::Stl(StlOptions::ascii("SimpleCube").with_triangulation()),
                ),
                ("simple_binary", small, small_req),
                ("medium_binary", medium, medium_req),
                ("large_binary", large, large_req),
            ]
        }
        MeshFormat::Ply => {
            let (medium, medium_req) = binary_ply(100);
            let (large, large_req) = binary_ply(1000);
            vec![
                ("simple_quad", Primitive::SimpleQuad, MeshRequest::Ply(PlyOptions::ascii())),
                ("medium_binary", medium, medium_req),
                ("large_binary", large, large_req),
            ]
        }
        MeshFormat::Gltf => vec![(
            "simple_triangle",
            Primitive::SimpleTriangle,
            MeshRequest::Gltf(GltfOptions::with_buffer_uri("simple_triangle.bin")),
        )],
        MeshFormat::Glb => vec![
            ("simple_triangle", Primitive::SimpleTriangle, MeshRequest::Glb(GltfOptions::positions_only())),
            ("cube", Primitive::Cube, MeshRequest::Glb(GltfOptions::default())),
        ],
    };

    for (name, primitive, request) in jobs {
        debug_assert_eq!(request.format(), format);
        entries.push(FixtureEntry::mesh(format, name, primitive, request));
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> FixtureResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| FixtureError::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| FixtureError::io(path, e))
}
