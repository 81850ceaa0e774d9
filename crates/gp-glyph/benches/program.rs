use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gp_core::program::{GlyphProgram, Uniforms, slots};
use gp_core::texture::{ColorFormat, RenderTexture, TextureDescriptor};
use gp_glyph::program::AsciiProgram;

fn uniforms() -> Uniforms {
    let mut u = Uniforms::default();
    u.set_float(slots::TILES_X, 80.0);
    u.set_float(slots::TILES_Y, 45.0);
    u.set_float(slots::RESOLUTION_X, 1920.0);
    u.set_float(slots::RESOLUTION_Y, 1080.0);
    u.set_float(slots::TILE_SIZE, 24.0);
    u.set_float(slots::CHAR_COUNT, 8.0);
    u.set_int(slots::MONOCHROMATIC, 0);
    u.set_float(slots::BRIGHTNESS, 0.8);
    u
}

fn bench_program(c: &mut Criterion) {
    let desc = TextureDescriptor::new(1920, 1080, ColorFormat::DefaultHdr);
    let mut src = RenderTexture::new(desc);
    for y in 0..desc.height {
        for x in 0..desc.width {
            src.set_texel(
                x,
                y,
                [x as f32 / 1920.0, y as f32 / 1080.0, 0.5, 1.0],
            );
        }
    }
    let mut dst = RenderTexture::new(desc);
    let program = AsciiProgram::new();
    let u = uniforms();

    c.bench_function("ascii_1080p", |b| {
        b.iter(|| program.apply(black_box(&u), black_box(&src), &mut dst));
    });
}

criterion_group!(benches, bench_program);
criterion_main!(benches);
