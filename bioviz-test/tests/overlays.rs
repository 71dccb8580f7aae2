use anyhow::Context;
use bioviz::types::{glam::Vec4, Drawlist, Passthrough, RenderFlags, Rgba32, SampleCount};
use bioviz_test::{flat_instance, no_gpu_return, params_with, test_attr, TestRunner, TEST_SIZE};

#[test_attr]
pub async fn rims_outline_instances() -> anyhow::Result<()> {
    let iad = no_gpu_return!(bioviz::create_iad(None, None).await).context("InstanceAdapterDevice creation failed")?;
    let mut runner = TestRunner::new(iad);
    let quad = runner.untextured_quad();
    let mut target = runner.target(TEST_SIZE, SampleCount::One)?;

    // Covers pixels 16..48 on both axes.
    let mut drawlist = Drawlist::new();
    drawlist.push(flat_instance(quad, 0.5, 0.0, Rgba32::WHITE, Passthrough::new(1, 0)).with_rim_alpha(255));

    let mut params = params_with(
        RenderFlags::DRAW_SCENE_GEOMETRY | RenderFlags::USE_INSTANCED_RENDERER | RenderFlags::DRAW_RIMS,
    );
    params.rim_rgba = Vec4::new(0.0, 1.0, 0.0, 1.0);
    runner.draw(&params, &drawlist, &mut target);
    assert_eq!(runner.renderer.last_frame_stats().overlay_draw_calls, 1);

    let scene = runner.read_scene(&target).await?;
    let [r, g, _, _] = scene.get_pixel(16, 32).0;
    assert!(r < 30 && g > 225, "edge pixel is {:?}", scene.get_pixel(16, 32).0);
    assert_eq!(scene.get_pixel(32, 32).0, [255, 255, 255, 255]);
    assert_eq!(scene.get_pixel(2, 32).0, [0, 0, 0, 255]);

    Ok(())
}

#[test_attr]
pub async fn zero_rim_alpha_draws_no_rim() -> anyhow::Result<()> {
    let iad = no_gpu_return!(bioviz::create_iad(None, None).await).context("InstanceAdapterDevice creation failed")?;
    let mut runner = TestRunner::new(iad);
    let quad = runner.untextured_quad();
    let mut target = runner.target(TEST_SIZE, SampleCount::One)?;

    let mut drawlist = Drawlist::new();
    drawlist.push(flat_instance(quad, 0.5, 0.0, Rgba32::WHITE, Passthrough::new(1, 0)));

    let mut params = params_with(
        RenderFlags::DRAW_SCENE_GEOMETRY | RenderFlags::USE_INSTANCED_RENDERER | RenderFlags::DRAW_RIMS,
    );
    params.rim_rgba = Vec4::new(0.0, 1.0, 0.0, 1.0);
    runner.draw(&params, &drawlist, &mut target);

    let scene = runner.read_scene(&target).await?;
    assert_eq!(scene.get_pixel(16, 32).0, [255, 255, 255, 255]);
    assert_eq!(scene.get_pixel(15, 32).0, [0, 0, 0, 255]);

    Ok(())
}

#[test_attr]
pub async fn every_stage_enabled() -> anyhow::Result<()> {
    let iad = no_gpu_return!(bioviz::create_iad(None, None).await).context("InstanceAdapterDevice creation failed")?;
    let mut runner = TestRunner::new(iad);
    let textured = runner.textured_quad();
    let untextured = runner.untextured_quad();
    let chequer = runner.storage.chequer_texture;

    let mut drawlist = Drawlist::new();
    drawlist.push(flat_instance(textured, 0.5, 0.2, Rgba32::WHITE, Passthrough::new(1, 0)).with_texture(chequer));
    drawlist.push(flat_instance(untextured, 0.25, 0.1, Rgba32::new(255, 0, 0, 128), Passthrough::new(2, 0)));
    drawlist.push(flat_instance(untextured, 0.1, 0.0, Rgba32::BLACK, Passthrough::new(3, 0)).with_rim_alpha(200));
    drawlist.optimize();

    // Wireframe would leave the hit test pixel uncovered.
    let mut params = params_with(RenderFlags::all().difference(RenderFlags::WIREFRAME_MODE));
    params.hittest = glam::IVec2::splat(TEST_SIZE as i32 / 2);

    for samples in SampleCount::ARRAY {
        let mut target = runner.target(TEST_SIZE, samples)?;
        for _ in 0..3 {
            runner.draw(&params, &drawlist, &mut target);
        }

        let stats = runner.renderer.last_frame_stats();
        assert_eq!(stats.instances, 3);
        assert_eq!(stats.normals_draw_calls, 3);
        assert_eq!(stats.overlay_draw_calls, 3);
        assert_eq!(target.last_hit_test(), Passthrough::new(3, 0));
    }

    Ok(())
}

#[test_attr]
pub async fn wireframe_leaves_interiors_empty() -> anyhow::Result<()> {
    let iad = no_gpu_return!(bioviz::create_iad(None, None).await).context("InstanceAdapterDevice creation failed")?;
    let mut runner = TestRunner::new(iad);
    let quad = runner.untextured_quad();

    let mut drawlist = Drawlist::new();
    drawlist.push(flat_instance(quad, 0.5, 0.0, Rgba32::WHITE, Passthrough::new(1, 0)));

    let params = params_with(
        RenderFlags::DRAW_SCENE_GEOMETRY | RenderFlags::USE_INSTANCED_RENDERER | RenderFlags::WIREFRAME_MODE,
    );
    let line_mode = runner.storage.shaders.gouraud().supports_wireframe();

    for samples in SampleCount::ARRAY {
        let mut target = runner.target(TEST_SIZE, samples)?;
        // Twice, so an unsupported device goes through the already-warned path.
        runner.draw(&params, &drawlist, &mut target);
        runner.draw(&params, &drawlist, &mut target);
        assert_eq!(runner.renderer.last_frame_stats().scene_draw_calls, 1);

        // Inside the quad, away from its edges and both diagonals.
        let scene = runner.read_scene(&target).await?;
        let interior = scene.get_pixel(22, 30).0;
        if line_mode {
            assert_eq!(interior, [0, 0, 0, 255], "samples: {samples:?}");
        } else {
            assert_eq!(interior, [255, 255, 255, 255], "samples: {samples:?}");
        }
    }

    Ok(())
}
