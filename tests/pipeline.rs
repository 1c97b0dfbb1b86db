//! Assets read from disk flowing into transitions and layers.

use std::{io::Cursor, rc::Rc};

use image::{ImageFormat, Rgba, RgbaImage};
use ons_rs::{ons_types::file::nbz, prelude::*};

fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
	let mut bytes = Vec::new();
	RgbaImage::from_pixel(width, height, Rgba(color))
		.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
		.unwrap();
	bytes
}

fn reader_over(dir: &std::path::Path) -> DirectReader {
	DirectReader::new(ArchivePaths::new([dir]), KeyTable::identity())
}

#[test]
fn test_furu_loads_elements_through_reader() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::create_dir(dir.path().join("Data")).unwrap();
	std::fs::write(dir.path().join("Data").join("Snow.PNG"), png(4, 4, [255, 0, 0, 255])).unwrap();

	let reader: Rc<dyn ArchiveReader> = Rc::new(reader_over(dir.path()));
	let mut layer = FuruLayer::new(16, 16, false).with_reader(reader).with_seed(5);
	layer.message("i|0,data/snow.png");
	layer.message("s|1,2,0,0,0");
	for _ in 0..3 {
		layer.update();
	}

	let mut frame = Surface::new(16, 16);
	let clip = frame.rect();
	layer.refresh(&mut frame, clip);
	assert!(frame.pixels().contains(&0xFFFF_0000));
}

#[test]
fn test_nbz_picture_decodes_on_read() {
	let dir = tempfile::tempdir().unwrap();
	let picture = png(8, 8, [0, 0, 255, 255]);
	let mut packed = Vec::new();
	nbz::encode(&mut packed, &picture).unwrap();
	std::fs::write(dir.path().join("bg.nbz"), packed).unwrap();

	let reader = reader_over(dir.path());
	assert_eq!(reader.file_length(b"BG.NBZ"), picture.len());
	let data = reader.read_file(b"bg.nbz").unwrap();
	assert_eq!(data, picture);

	let sprite = Sprite::from_bytes(&data, 1).unwrap();
	assert_eq!(sprite.surface().get(3, 3), Some(0xFF00_00FF));
}

#[test]
fn test_transition_ends_on_loaded_picture() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::write(dir.path().join("title.png"), png(32, 24, [10, 200, 30, 255])).unwrap();
	let reader = reader_over(dir.path());
	let target = Sprite::load(&reader, "title.png", 1).unwrap();

	let clock = ManualClock::new(0);
	let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
	let mut surfaces = Surfaces::new(32, 24);
	let mut scene = StaticScene::new(target.surface().clone());
	let mut link = EffectLink::new(18, 200);

	surfaces.dirty.fill();
	let mut status = executor.set_effect(&mut link, EffectDst::Generate, false, &mut surfaces, &mut scene);
	let mut ticks = 0;
	while status == EffectStatus::Wait {
		status = executor.do_effect(&link, true, &mut surfaces, &mut scene);
		ticks += 1;
	}

	assert!(ticks > 1);
	assert_eq!(surfaces.get(Role::Accumulation), target.surface());
}
