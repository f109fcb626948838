const THEME_CSS: &str = r#"
:root{
  --mk-red:#E60000; --mk-gray-light:#f4f3ee; --mk-text:#1c1c1c;
  --grid-container-width:1280px; --grid-container-spacing:24px;
  --stripe-width:4px; --stripe-offset:28px;
}
html,body{ margin:0; padding:0; background:#fff; color:var(--mk-text);
  font-family:'FrutigerforUBSWeb','Frutiger','Helvetica Neue',Arial,sans-serif; font-weight:300; }
.mk-header{ display:flex; align-items:center; justify-content:space-between;
  max-width:var(--grid-container-width); margin:0 auto; padding:16px var(--grid-container-spacing); }
.mk-header__logo{ height:40px; }
.mk-header__tools{ display:flex; gap:20px; align-items:center; }
.mk-header__tools img{ width:24px; height:24px; }
.mk-hero{ position:relative; min-height:420px; background-size:cover; background-position:center; }
.mk-hero__panel{ position:absolute; left:var(--grid-container-spacing); bottom:48px; max-width:520px;
  background:#fff; padding:32px; border-left:var(--stripe-width) solid var(--mk-red); }
.mk-hero__panel h1{ font-family:'UBS Headline',Georgia,serif; font-weight:400; margin:0 0 12px 0; }
.mk-btn-primary{ display:inline-flex; align-items:center; justify-content:center; padding:10px 16px;
  font-weight:700; font-size:14px; text-decoration:none; background:var(--mk-red); color:#fff !important; border:0; }
.mk-services{ display:grid; grid-template-columns:repeat(3,1fr); gap:24px; }
.mk-services__item h3{ font-weight:400; margin:0 0 8px 0; }
.full-bleed.section-spacer{ height:var(--spacer-size,48px); background:#fff; }
.mk-warning{ border-left:4px solid #d98c00; background:#fff8e6; padding:10px 14px; margin:0 0 12px 0; }
.mk-grid{ display:grid; grid-template-columns:repeat(var(--mk-cols),1fr); gap:24px; }
.mk-footer{ border-top:1px solid #dcdcdc; padding:32px var(--grid-container-spacing); font-size:14px; color:#6b6f72; }
"#;

const CARD_CSS: &str = r#"
.mk-card{ background:#fff; border:1px solid #dcdcdc; box-sizing:border-box; width:100%;
  display:flex; gap:20px; align-items:flex-start; margin-bottom:24px; }
.mk-card--row{ --thumb:220px; box-shadow:0 4px 10px rgba(0,0,0,.04); padding:20px; }
.mk-card--clamp{ max-width:900px; }
.mk-card--tile{ --tile-height:560px; flex-direction:column; padding:0; height:var(--tile-height); overflow:hidden; }
.mk-card__thumbwrap{ position:relative; width:var(--thumb); flex:0 0 var(--thumb); }
.mk-card__thumb{ width:100%; aspect-ratio:4/3; object-fit:cover; background:#f3f3f3; }
.mk-card--tile .mk-card__thumbwrap{ width:100%; height:calc(var(--tile-height) * 0.46); flex:0 0 auto; }
.mk-card--tile .mk-card__thumb{ height:100%; display:block; }
.mk-card__status{ position:absolute; top:8px; left:8px; background:rgba(255,255,255,.92);
  border:1px solid #e5e5e5; padding:1px 6px; font-size:11px; font-weight:600; color:#6b6f72; }
.mk-card__body{ flex:1 1 auto; min-width:0; }
.mk-card--tile .mk-card__body{ padding:20px 20px 28px 20px; display:flex; flex-direction:column; }
.mk-card__title{ font-family:'UBS Headline',Georgia,serif; font-weight:400; font-size:20px; color:#444; margin:0; }
.mk-card__desc{ font-size:16px; line-height:1.625rem; color:#111; margin:8px 0 10px 0; max-width:60ch; }
.mk-card__tags{ display:flex; flex-wrap:wrap; gap:6px; margin:6px 0 10px 0; }
.mk-card__tag{ border:1px solid #cfcfcf; padding:2px 8px; font-size:12px; font-weight:500; color:#111; }
.mk-card__actions{ margin-top:16px; display:flex; flex-wrap:wrap; gap:12px 18px; align-items:center; }
.mk-card--tile .mk-card__actions{ margin-top:auto; }
.mk-card__actions a{ color:#111; text-decoration:none; font-weight:700; }
.mk-card__actions .mk-btn-primary{ color:#fff !important; }
.mk-chev{ width:16px; height:16px; display:inline-block; stroke:var(--mk-red); fill:none; stroke-width:2; }
.mk-card--feature{ --tile-height:560px; flex-direction:row; align-items:stretch; gap:0;
  height:calc(var(--tile-height) * 0.5); position:relative; }
.mk-card--feature::before{ content:""; position:absolute; top:0; bottom:0; width:var(--stripe-width);
  left:calc(-1px - var(--stripe-width) - var(--stripe-offset)); background:var(--mk-red); }
.mk-card--feature .mk-card__thumbwrap{ flex:1 1 auto; height:100%; }
.mk-card--feature .mk-card__body{ padding:20px; display:flex; flex-direction:column; }
.mk-feature-kicker{ font-size:12px; text-transform:uppercase; letter-spacing:.04em; color:#6b6f72; margin:0 0 6px 0; }
@media (max-width: 960px){
  .mk-services{ grid-template-columns:1fr; }
  .mk-grid{ grid-template-columns:1fr; }
  .mk-card--row, .mk-card--feature{ flex-direction:column; height:auto; }
}
"#;

/// Page stylesheet: embedded font faces, theme, hero background and cards.
pub fn page_css(fonts_css: &str, hero_uri: &str) -> String {
    let mut css = String::with_capacity(fonts_css.len() + hero_uri.len() + 8192);
    css.push_str(fonts_css);
    css.push_str(THEME_CSS);
    css.push_str(".mk-hero{ background-image:url('");
    css.push_str(hero_uri);
    css.push_str("'); }\n");
    css.push_str(CARD_CSS);
    css
}
