use std::io::{self, Write};

use imageproc_texel::{Complex, ComplexBuffer, Layout, PixelBuffer, ScalarBuffer};

use crate::{
    encode_to_vec, load, load_into, save, ColorMode, DecodeOptions, Decoder, EncodeOptions,
    Encoder, Error, SIGNATURE,
};

/// Encode a fixture directly with the png crate, in any variant the format allows.
struct Fixture<'data> {
    width: u32,
    height: u32,
    color: png::ColorType,
    depth: png::BitDepth,
    palette: Option<&'data [u8]>,
    trns: Option<&'data [u8]>,
}

impl<'data> Fixture<'data> {
    fn new(width: u32, height: u32, color: png::ColorType, depth: png::BitDepth) -> Self {
        Fixture {
            width,
            height,
            color,
            depth,
            palette: None,
            trns: None,
        }
    }

    fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut stream = Vec::new();
        let mut encoder = png::Encoder::new(&mut stream, self.width, self.height);
        encoder.set_color(self.color);
        encoder.set_depth(self.depth);
        if let Some(palette) = self.palette {
            encoder.set_palette(palette.to_vec());
        }
        if let Some(trns) = self.trns {
            encoder.set_trns(trns.to_vec());
        }

        let mut writer = encoder.write_header().expect("valid fixture header");
        writer.write_image_data(data).expect("valid fixture data");
        writer.finish().expect("fixture finishes");
        stream
    }
}

fn gray_ramp() -> Vec<u8> {
    let mut data = vec![0, 64, 128, 255];
    data.extend((0..12).map(|i| i * 20));
    data
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn gray_round_trip_is_identical() -> Result<(), Error> {
    let layout = Layout::width_and_height(4, 4).unwrap();
    let source = PixelBuffer::from_pixels(layout, gray_ramp()).unwrap();
    let original = encode_to_vec(&source, &EncodeOptions::default())?;

    let decoded: ScalarBuffer = Decoder::new(&original[..]).decode()?;
    assert_eq!((decoded.width(), decoded.height()), (4, 4));
    assert_eq!(&decoded.as_slice()[..4], &[0, 64, 128, 255]);

    let mut again = Vec::new();
    Encoder::new(&mut again).encode(&decoded)?;
    assert_eq!(again, original);
    Ok(())
}

#[test]
fn fixture_gray_values() -> Result<(), Error> {
    let data = gray_ramp();
    let stream =
        Fixture::new(4, 4, png::ColorType::Grayscale, png::BitDepth::Eight).encode(&data);

    let decoded: PixelBuffer<u8> = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded.as_slice(), &data[..]);
    Ok(())
}

#[test]
fn rejects_non_image() {
    let err = Decoder::new(&b"definitely not an image file"[..])
        .decode::<i32>()
        .unwrap_err();
    assert!(matches!(err, Error::Format(ref msg) if msg == "not a recognized image"));

    let err = Decoder::new(&b"\x89PN"[..]).decode::<i32>().unwrap_err();
    assert!(err.is_format());

    let err = Decoder::new(io::empty()).read_info().unwrap_err();
    assert!(err.is_format());
}

#[test_log::test]
fn rgb_reads_first_channel() -> Result<(), Error> {
    #[rustfmt::skip]
    let data: [u8; 12] = [
        10, 1, 2,    20, 3, 4,
        30, 5, 6,    40, 7, 8,
    ];
    let stream = Fixture::new(2, 2, png::ColorType::Rgb, png::BitDepth::Eight).encode(&data);

    let decoded: ScalarBuffer = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded.as_slice(), &[10, 20, 30, 40]);
    assert_eq!(*decoded.pixel(1, 1).unwrap(), 40);
    Ok(())
}

#[test_log::test]
fn rgba_reads_first_channel() -> Result<(), Error> {
    let data: [u8; 8] = [200, 0, 0, 0, 100, 255, 255, 255];
    let stream = Fixture::new(2, 1, png::ColorType::Rgba, png::BitDepth::Eight).encode(&data);

    let decoded: PixelBuffer<u8> = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded.as_slice(), &[200, 100]);
    Ok(())
}

#[test]
fn sixteen_bit_is_truncated() -> Result<(), Error> {
    let data: [u8; 6] = [0x12, 0x34, 0xff, 0x00, 0x00, 0xff];
    let stream =
        Fixture::new(3, 1, png::ColorType::Grayscale, png::BitDepth::Sixteen).encode(&data);

    let decoded: ScalarBuffer = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded.as_slice(), &[0x12, 0xff, 0x00]);
    Ok(())
}

#[test_log::test]
fn palette_is_expanded() -> Result<(), Error> {
    let palette: [u8; 6] = [10, 20, 30, 200, 100, 50];
    let mut fixture = Fixture::new(2, 2, png::ColorType::Indexed, png::BitDepth::Eight);
    fixture.palette = Some(&palette);
    let stream = fixture.encode(&[0, 1, 1, 0]);

    let info = Decoder::new(&stream[..]).read_info()?;
    assert_eq!(info.color, ColorMode::Indexed);
    assert_eq!(info.normalized_channels(), 3);

    let decoded: ScalarBuffer = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded.as_slice(), &[10, 200, 200, 10]);
    Ok(())
}

#[test]
fn sub_byte_gray_is_scaled() -> Result<(), Error> {
    // One row of four 1-bit samples: on, off, on, off.
    let stream = Fixture::new(4, 1, png::ColorType::Grayscale, png::BitDepth::One)
        .encode(&[0b1010_0000]);

    let decoded: ScalarBuffer = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded.as_slice(), &[255, 0, 255, 0]);

    // Two 2-bit samples per row, across two rows: 3, 1 then 0, 2.
    let stream = Fixture::new(2, 2, png::ColorType::Grayscale, png::BitDepth::Two)
        .encode(&[0b1101_0000, 0b0010_0000]);

    let decoded: ScalarBuffer = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded.as_slice(), &[255, 85, 0, 170]);
    Ok(())
}

#[test_log::test]
fn transparency_becomes_alpha() -> Result<(), Error> {
    let trns: [u8; 2] = [0, 7];
    let mut fixture = Fixture::new(3, 1, png::ColorType::Grayscale, png::BitDepth::Eight);
    fixture.trns = Some(&trns);
    let stream = fixture.encode(&[7, 8, 9]);

    let info = Decoder::new(&stream[..]).read_info()?;
    assert!(info.transparency);
    assert_eq!(info.normalized_channels(), 2);

    let decoded: ScalarBuffer = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded.as_slice(), &[7, 8, 9]);
    Ok(())
}

#[test]
fn header_info() -> Result<(), Error> {
    let stream = Fixture::new(5, 3, png::ColorType::GrayscaleAlpha, png::BitDepth::Sixteen)
        .encode(&[0; 5 * 3 * 4]);

    let info = Decoder::new(&stream[..]).read_info()?;
    assert_eq!((info.width, info.height), (5, 3));
    assert_eq!(info.bit_depth, 16);
    assert_eq!(info.color, ColorMode::LumaA);
    assert!(!info.interlaced);
    assert!(!info.transparency);
    assert_eq!(info.to_string(), "5x3 LumaA at 16 bit");
    Ok(())
}

#[test]
fn truncated_stream_is_format_error() {
    let stream = Fixture::new(4, 4, png::ColorType::Grayscale, png::BitDepth::Eight)
        .encode(&gray_ramp());

    for cut in [9, 20, 33, 45] {
        let err = Decoder::new(&stream[..cut]).decode::<i32>().unwrap_err();
        assert!(err.is_format(), "cut at {cut}: {err}");
    }
}

#[test]
fn corrupt_chunk_is_format_error() {
    let mut stream = Fixture::new(4, 4, png::ColorType::Grayscale, png::BitDepth::Eight)
        .encode(&gray_ramp());
    // Flip a bit of the header's checksum.
    stream[8 + 8 + 13] ^= 0x01;

    let err = Decoder::new(&stream[..]).decode::<i32>().unwrap_err();
    assert!(err.is_format(), "{err}");
}

#[test]
fn corrupt_end_chunk_is_format_error() {
    let mut stream = Fixture::new(4, 4, png::ColorType::Grayscale, png::BitDepth::Eight)
        .encode(&gray_ramp());
    assert_eq!(&stream[stream.len() - 8..stream.len() - 4], b"IEND");
    // Flip a bit of the end marker's checksum.
    let last = stream.len() - 1;
    stream[last] ^= 0x01;

    let err = Decoder::new(&stream[..]).decode::<i32>().unwrap_err();
    assert!(err.is_format(), "{err}");

    let mut buffer = ScalarBuffer::with_width_and_height(1, 1).unwrap();
    assert!(Decoder::new(&stream[..]).decode_into(&mut buffer).is_err());
    assert_eq!(buffer.len(), 1);
}

#[test]
fn decode_limit_is_format_error() {
    let stream = Fixture::new(4, 4, png::ColorType::Grayscale, png::BitDepth::Eight)
        .encode(&gray_ramp());
    let options = DecodeOptions { limit_bytes: 4 };

    let err = Decoder::with_options(&stream[..], options)
        .decode::<i32>()
        .unwrap_err();
    assert!(err.is_format());
}

#[test]
fn decode_limit_covers_the_buffer() -> Result<(), Error> {
    let stream = Fixture::new(64, 64, png::ColorType::Grayscale, png::BitDepth::Eight)
        .encode(&[7; 64 * 64]);
    // Fits the 4 KiB of samples and a scalar buffer, not 16 bytes per complex sample.
    let options = DecodeOptions {
        limit_bytes: 32 * 1024,
    };

    let scalar: ScalarBuffer = Decoder::with_options(&stream[..], options).decode()?;
    assert_eq!(scalar.len(), 64 * 64);

    let err = Decoder::with_options(&stream[..], options)
        .decode::<Complex>()
        .unwrap_err();
    assert!(err.is_format(), "{err}");

    let complex: ComplexBuffer = Decoder::new(&stream[..]).decode()?;
    assert_eq!(complex.as_bytes().len(), 64 * 64 * 16);
    Ok(())
}

#[test]
fn failed_decode_keeps_destination() {
    let mut buffer = ScalarBuffer::with_width_and_height(2, 2).unwrap();
    buffer.fill(3);
    let before = buffer.clone();

    let err = Decoder::new(&b"garbage"[..]).decode_into(&mut buffer).unwrap_err();
    assert!(err.is_format());
    assert_eq!(buffer, before);
}

#[test]
fn decode_into_replaces_destination() -> Result<(), Error> {
    let stream =
        Fixture::new(3, 1, png::ColorType::Grayscale, png::BitDepth::Eight).encode(&[1, 2, 3]);

    let mut buffer = ScalarBuffer::with_width_and_height(7, 7).unwrap();
    Decoder::new(&stream[..]).decode_into(&mut buffer)?;
    assert_eq!(buffer.as_slice(), &[1, 2, 3]);
    Ok(())
}

#[test]
fn empty_buffer_encodes_header_only() -> Result<(), Error> {
    let stream = encode_to_vec(&ScalarBuffer::new(), &EncodeOptions::default())?;

    // Signature, the 13 byte header chunk, the end chunk.
    assert_eq!(stream.len(), 8 + (12 + 13) + 12);
    assert_eq!(stream[..8], SIGNATURE);
    assert_eq!(&stream[12..16], b"IHDR");
    assert_eq!(&stream[16..24], &[0; 8]);
    assert_eq!(&stream[24..29], &[8, 0, 0, 0, 0]);
    assert_eq!(&stream[37..41], b"IEND");
    // The well-known checksum of an empty end chunk.
    assert_eq!(&stream[41..], &[0xae, 0x42, 0x60, 0x82]);

    // Zero dimensions are not a valid image to read back.
    assert!(Decoder::new(&stream[..]).decode::<i32>().unwrap_err().is_format());
    Ok(())
}

#[test]
fn empty_row_buffer_keeps_width() -> Result<(), Error> {
    let mut buffer = ScalarBuffer::new();
    buffer.resize(3, 0).unwrap();

    let stream = encode_to_vec(&buffer, &EncodeOptions::default())?;
    assert_eq!(&stream[16..20], &3u32.to_be_bytes());
    assert_eq!(&stream[20..24], &0u32.to_be_bytes());
    Ok(())
}

#[test]
fn scalar_projection_clamps() -> Result<(), Error> {
    let layout = Layout::width_and_height(4, 1).unwrap();
    let buffer = PixelBuffer::from_pixels(layout, vec![-10i32, 0, 99, 300]).unwrap();
    let stream = encode_to_vec(&buffer, &EncodeOptions::default())?;

    let decoded: PixelBuffer<u8> = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded.as_slice(), &[0, 0, 99, 255]);
    Ok(())
}

#[test]
fn complex_projection_is_magnitude() -> Result<(), Error> {
    let mut buffer = ComplexBuffer::with_width_and_height(3, 1).unwrap();
    *buffer.pixel_mut(0, 0).unwrap() = Complex::new(3.0, 4.0);
    *buffer.pixel_mut(1, 0).unwrap() = Complex::new(0.0, -1000.0);
    *buffer.pixel_mut(2, 0).unwrap() = Complex::new(f64::NAN, 0.0);

    let stream = encode_to_vec(&buffer, &EncodeOptions::default())?;
    let decoded: ScalarBuffer = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded.as_slice(), &[5, 255, 0]);

    let complex: ComplexBuffer = Decoder::new(&stream[..]).decode()?;
    assert_eq!(*complex.pixel(0, 0).unwrap(), Complex::new(5.0, 0.0));
    Ok(())
}

#[test]
fn encoder_options_roundtrip() -> Result<(), Error> {
    let layout = Layout::width_and_height(4, 4).unwrap();
    let source = PixelBuffer::from_pixels(layout, gray_ramp()).unwrap();
    let options = EncodeOptions {
        compression: crate::Compression::Best,
        filter: crate::FilterType::Paeth,
    };

    let stream = encode_to_vec(&source, &options)?;
    let decoded: PixelBuffer<u8> = Decoder::new(&stream[..]).decode()?;
    assert_eq!(decoded, source);
    Ok(())
}

#[test]
fn unwritable_stream_is_io_error() {
    let buffer = ScalarBuffer::with_width_and_height(2, 2).unwrap();
    let err = Encoder::new(FailingWriter).encode(&buffer).unwrap_err();
    assert!(matches!(err, Error::Io(ref err) if err.kind() == io::ErrorKind::PermissionDenied));
}

#[test]
fn file_round_trip() -> Result<(), Error> {
    let dir = std::env::temp_dir().join(format!("imageproc-canvas-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("ramp.png");

    let layout = Layout::width_and_height(4, 4).unwrap();
    let source = PixelBuffer::from_pixels(layout, gray_ramp()).unwrap();
    save(&path, &source)?;

    let loaded: PixelBuffer<u8> = load(&path)?;
    assert_eq!(loaded, source);

    let mut complex = ComplexBuffer::new();
    load_into(&path, &mut complex)?;
    assert_eq!(*complex.pixel(3, 0).unwrap(), Complex::new(255.0, 0.0));

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("imageproc-canvas-does-not-exist.png");
    let err = load::<i32>(&path).unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    let mut buffer = ScalarBuffer::with_width_and_height(1, 1).unwrap();
    assert!(load_into(&path, &mut buffer).is_err());
    assert_eq!(buffer.len(), 1);
}

#[test]
fn unwritable_path_is_io_error() {
    let path = std::env::temp_dir()
        .join("imageproc-canvas-missing-dir")
        .join("nested")
        .join("out.png");
    let err = save(&path, &ScalarBuffer::new()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
