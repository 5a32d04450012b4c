//! 端到端流水线测试：内存剪贴板替身 → 重建 → 落盘 → 场景放置。

use clipboard_import::clipboard::{rgba_to_dib, ClipboardSource, DibFormat};
use clipboard_import::dib::DibHeader;
use clipboard_import::error::AppError;
use clipboard_import::host::{BillboardSpec, LoadedImage, PlacementMode, PlaneSpec, SceneHost};
use clipboard_import::import;
use clipboard_import::storage::StorageConfig;

use image::GenericImageView;

/// 按格式返回预置字节的剪贴板替身。
struct FakeClipboard {
    dib: Option<Vec<u8>>,
    dibv5: Option<Vec<u8>>,
}

impl ClipboardSource for FakeClipboard {
    fn is_format_available(&self, format: DibFormat) -> bool {
        match format {
            DibFormat::Dib => self.dib.is_some(),
            DibFormat::DibV5 => self.dibv5.is_some(),
        }
    }

    fn read(&self, format: DibFormat) -> Result<Option<Vec<u8>>, AppError> {
        Ok(match format {
            DibFormat::Dib => self.dib.clone(),
            DibFormat::DibV5 => self.dibv5.clone(),
        })
    }
}

/// 统计调用次数的宿主替身。
#[derive(Default)]
struct CountingHost {
    billboards: usize,
    planes: usize,
    last_aspect: Option<f32>,
}

impl SceneHost for CountingHost {
    fn create_billboard(
        &mut self,
        _image: &LoadedImage,
        _spec: &BillboardSpec,
    ) -> Result<(), AppError> {
        self.billboards += 1;
        Ok(())
    }

    fn create_textured_plane(
        &mut self,
        _image: &LoadedImage,
        spec: &PlaneSpec,
    ) -> Result<(), AppError> {
        self.planes += 1;
        self.last_aspect = Some(spec.aspect_scale_x);
        Ok(())
    }
}

/// 构造一个 4x2 渐变图的 32bpp DIB（走与 arboard 桥接相同的合成路径）。
fn gradient_dib_4x2() -> Vec<u8> {
    let mut rgba = Vec::with_capacity(4 * 2 * 4);
    for y in 0..2u8 {
        for x in 0..4u8 {
            rgba.extend_from_slice(&[x * 60, y * 120, 200, 255]);
        }
    }
    rgba_to_dib(4, 2, &rgba).expect("synthesis should succeed")
}

#[test]
fn captured_file_round_trips_through_a_standard_bmp_reader() {
    let temp = tempfile::tempdir().expect("tempdir should be created");
    let storage = StorageConfig::new(Some(temp.path().to_path_buf()));
    let dib = gradient_dib_4x2();
    let clipboard = FakeClipboard {
        dib: None,
        dibv5: Some(dib.clone()),
    };

    let report = import::capture_to_file(&clipboard, &storage)
        .expect("capture should succeed")
        .expect("clipboard holds an image");

    assert_eq!(report.format, "CF_DIBV5");
    assert_eq!((report.width, report.height), (4, 2));
    assert_eq!(report.file_size, 14 + dib.len() as u64);

    // 落盘文件可被标准 BMP 读取器打开，且 DIB 部分逐字节保留
    let written = std::fs::read(&report.path).expect("file should exist");
    assert_eq!(&written[14..], &dib[..]);

    let decoded = image::open(&report.path).expect("saved BMP should decode");
    assert_eq!(decoded.dimensions(), (4, 2));
    // 左上角像素应与合成前的 RGBA 首像素一致
    let top_left = decoded.to_rgba8().get_pixel(0, 0).0;
    assert_eq!(top_left, [0, 0, 200, 255]);

    // 文件头声明的像素偏移与信息头推导一致
    let header = DibHeader::parse(&dib).expect("header should parse");
    let declared_offset =
        u32::from_le_bytes([written[10], written[11], written[12], written[13]]);
    assert_eq!(u64::from(declared_offset), header.pixel_data_offset());
}

#[test]
fn v5_variant_wins_when_both_formats_are_present() {
    let temp = tempfile::tempdir().expect("tempdir should be created");
    let storage = StorageConfig::new(Some(temp.path().to_path_buf()));
    let clipboard = FakeClipboard {
        dib: Some(gradient_dib_4x2()),
        dibv5: Some(gradient_dib_4x2()),
    };

    let report = import::capture_to_file(&clipboard, &storage)
        .expect("capture should succeed")
        .expect("clipboard holds an image");
    assert_eq!(report.format, "CF_DIBV5");
}

#[test]
fn full_import_places_objects_for_both_modes() {
    let temp = tempfile::tempdir().expect("tempdir should be created");
    let storage = StorageConfig::new(Some(temp.path().to_path_buf()));
    let clipboard = FakeClipboard {
        dib: Some(gradient_dib_4x2()),
        dibv5: None,
    };
    let mut host = CountingHost::default();

    import::import_from_clipboard(&clipboard, &storage, &mut host, PlacementMode::Reference)
        .expect("reference import should succeed")
        .expect("clipboard holds an image");
    import::import_from_clipboard(&clipboard, &storage, &mut host, PlacementMode::Mesh)
        .expect("mesh import should succeed")
        .expect("clipboard holds an image");

    assert_eq!(host.billboards, 1);
    assert_eq!(host.planes, 1);
    assert_eq!(host.last_aspect, Some(2.0));

    // 两次导入各落一个文件，互不覆盖
    let saved = std::fs::read_dir(storage.root())
        .expect("storage dir should exist")
        .count();
    assert_eq!(saved, 2);
}
