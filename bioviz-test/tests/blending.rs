use anyhow::Context;
use bioviz::types::{Drawlist, Passthrough, RenderFlags, Rgba32, SampleCount};
use bioviz_test::{flat_instance, no_gpu_return, params_with, test_attr, TestRunner, TEST_SIZE};
use glam::IVec2;

#[test_attr]
pub async fn passthrough_is_never_blended() -> anyhow::Result<()> {
    let iad = no_gpu_return!(bioviz::create_iad(None, None).await).context("InstanceAdapterDevice creation failed")?;
    let mut runner = TestRunner::new(iad);
    let quad = runner.untextured_quad();

    for samples in SampleCount::ARRAY {
        let mut target = runner.target(TEST_SIZE, samples)?;

        let mut drawlist = Drawlist::new();
        // Pushed near first; optimize draws the more opaque far quad first.
        drawlist.push(flat_instance(
            quad,
            1.0,
            0.25,
            Rgba32::new(0, 0, 255, 128),
            Passthrough::new(2, 0),
        ));
        drawlist.push(flat_instance(
            quad,
            1.0,
            0.5,
            Rgba32::new(255, 0, 0, 200),
            Passthrough::new(1, 0),
        ));
        drawlist.optimize();
        assert_eq!(drawlist[0].passthrough, Passthrough::new(1, 0));

        let mut params = params_with(
            RenderFlags::DRAW_SCENE_GEOMETRY
                | RenderFlags::USE_INSTANCED_RENDERER
                | RenderFlags::PERFORM_PASSTHROUGH_HIT_TEST,
        );
        params.hittest = IVec2::splat(TEST_SIZE as i32 / 2);

        assert_eq!(
            runner.draw(&params, &drawlist, &mut target),
            Passthrough::new(2, 0),
            "samples: {samples:?}"
        );

        let scene = runner.read_scene(&target).await?;
        let [r, g, b, _] = scene.get_pixel(32, 32).0;
        // Red at 200/255 over black, then blue at 128/255 over that.
        assert!((95..=105).contains(&r), "red channel {r}");
        assert_eq!(g, 0);
        assert!((123..=133).contains(&b), "blue channel {b}");

        let passthrough = runner.read_passthrough(&target).await?;
        assert_eq!(passthrough.get_pixel(32, 32).0, [2, 0, 0, 255]);
    }

    Ok(())
}

#[test_attr]
pub async fn rim_alpha_lands_in_passthrough_blue() -> anyhow::Result<()> {
    let iad = no_gpu_return!(bioviz::create_iad(None, None).await).context("InstanceAdapterDevice creation failed")?;
    let mut runner = TestRunner::new(iad);
    let quad = runner.untextured_quad();
    let mut target = runner.target(TEST_SIZE, SampleCount::One)?;

    let mut drawlist = Drawlist::new();
    drawlist.push(flat_instance(quad, 1.0, 0.0, Rgba32::WHITE, Passthrough::new(0x12, 0x34)).with_rim_alpha(0x56));

    let params = params_with(RenderFlags::DRAW_SCENE_GEOMETRY | RenderFlags::USE_INSTANCED_RENDERER);
    runner.draw(&params, &drawlist, &mut target);

    let passthrough = runner.read_passthrough(&target).await?;
    assert_eq!(passthrough.get_pixel(5, 60).0, [0x12, 0x34, 0x56, 255]);

    Ok(())
}

#[test_attr]
pub async fn chequer_texture_is_sampled_exactly() -> anyhow::Result<()> {
    let iad = no_gpu_return!(bioviz::create_iad(None, None).await).context("InstanceAdapterDevice creation failed")?;
    let mut runner = TestRunner::new(iad);
    let quad = runner.textured_quad();
    let chequer = runner.storage.chequer_texture;
    let mut target = runner.target(TEST_SIZE, SampleCount::One)?;

    let mut drawlist = Drawlist::new();
    drawlist.push(flat_instance(quad, 1.0, 0.0, Rgba32::WHITE, Passthrough::new(1, 0)).with_texture(chequer));

    let params = params_with(RenderFlags::DRAW_SCENE_GEOMETRY | RenderFlags::USE_INSTANCED_RENDERER);
    runner.draw(&params, &drawlist, &mut target);

    let scene = runner.read_scene(&target).await?;
    let left = scene.get_pixel(10, 10).0;
    let right = scene.get_pixel(40, 10).0;
    for pixel in [left, right] {
        assert!([0xe5, 0xde].contains(&pixel[0]), "{pixel:?}");
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[3], 255);
    }
    assert_ne!(left, right);
    assert_eq!(scene.get_pixel(10, 40).0, right);

    Ok(())
}
