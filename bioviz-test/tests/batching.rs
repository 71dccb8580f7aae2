use anyhow::Context;
use bioviz::types::{
    glam::UVec2, Drawlist, Passthrough, RenderFlags, Rgba32, SampleCount, Texture, TextureFilter,
};
use bioviz_test::{flat_instance, no_gpu_return, params_with, test_attr, TestRunner, TEST_SIZE};

#[test_attr]
pub async fn alternating_pairs_use_two_draw_calls() -> anyhow::Result<()> {
    let iad = no_gpu_return!(bioviz::create_iad(None, None).await).context("InstanceAdapterDevice creation failed")?;
    let mut runner = TestRunner::new(iad);

    let mesh_a = runner.textured_quad();
    let mesh_b = runner.textured_quad();
    let texture_x = runner.storage.chequer_texture;
    let texture_y = runner.storage.upload_texture(
        &Texture::from_rgba8(UVec2::splat(2), vec![0x80; 16])
            .context("texture data is valid")?
            .with_filter(TextureFilter::Nearest),
    );

    let mut drawlist: Drawlist = (0..1000u16)
        .map(|i| {
            let (mesh, texture) = if i % 2 == 0 {
                (mesh_a, texture_x)
            } else {
                (mesh_b, texture_y)
            };
            flat_instance(mesh, 0.01, 0.5, Rgba32::WHITE, Passthrough::from_u16(i + 1)).with_texture(texture)
        })
        .collect();
    drawlist.optimize();

    let mut target = runner.target(TEST_SIZE, SampleCount::Four)?;
    let mut params = params_with(RenderFlags::DRAW_SCENE_GEOMETRY | RenderFlags::USE_INSTANCED_RENDERER);

    runner.draw(&params, &drawlist, &mut target);
    let stats = runner.renderer.last_frame_stats();
    assert_eq!(stats.scene_draw_calls, 2);
    assert_eq!(stats.instances, 1000);

    params.flags.remove(RenderFlags::USE_INSTANCED_RENDERER);
    runner.draw(&params, &drawlist, &mut target);
    assert_eq!(runner.renderer.last_frame_stats().scene_draw_calls, 1000);

    params.flags.remove(RenderFlags::DRAW_SCENE_GEOMETRY);
    runner.draw(&params, &drawlist, &mut target);
    assert_eq!(runner.renderer.last_frame_stats().scene_draw_calls, 0);

    Ok(())
}

#[test_attr]
pub async fn empty_drawlist_clears_to_background() -> anyhow::Result<()> {
    let iad = no_gpu_return!(bioviz::create_iad(None, None).await).context("InstanceAdapterDevice creation failed")?;
    let mut runner = TestRunner::new(iad);
    let mut target = runner.target(TEST_SIZE, SampleCount::One)?;

    let mut params = params_with(RenderFlags::default());
    params.background_rgba = glam::Vec4::new(0.0, 1.0, 0.0, 1.0);
    params.hittest = glam::IVec2::new(10, 10);

    assert_eq!(runner.draw(&params, &Drawlist::new(), &mut target), Passthrough::NONE);
    assert_eq!(runner.renderer.last_frame_stats().scene_draw_calls, 0);

    let scene = runner.read_scene(&target).await?;
    assert_eq!(scene.get_pixel(10, 10).0, [0, 255, 0, 255]);
    let passthrough = runner.read_passthrough(&target).await?;
    assert_eq!(passthrough.get_pixel(10, 10).0, [0, 0, 0, 0]);

    Ok(())
}
