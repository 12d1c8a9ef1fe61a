#[cfg(test)]
mod walker_tests {
    use crate::*;

    const PAGE: &str = "https://example.com/page.html";

    fn paragraph(text: &str) -> Element {
        Element::new("div")
            .with_class("paragraph")
            .with_child(Element::new("p").with_text(text))
    }

    fn section_body(children: Vec<Element>) -> Element {
        children
            .into_iter()
            .fold(Element::new("div").with_class("sectionbody"), |body, child| {
                body.with_child(child)
            })
    }

    fn list(tag: &str, items: &[&str]) -> Element {
        items.iter().fold(Element::new(tag), |list, item| {
            list.with_child(Element::new("li").with_text(*item))
        })
    }

    fn raw(style: Style, element: &Element) -> String {
        let mut block = DocumentationBlock::new(style, PAGE, 0);
        let context = block.context();
        block.add_element(element, &context);
        block.as_str().to_string()
    }

    fn finished(style: Style, element: &Element) -> String {
        let mut block = DocumentationBlock::new(style, PAGE, 0);
        let context = block.context();
        block.add_element(element, &context);
        block.finish()
    }

    #[test]
    fn test_registry_links() {
        let p = Element::new("div").with_class("paragraph").with_child(
            Element::new("p")
                .with_text("See ")
                .with_child(Element::new("a").with_attr("href", "VkFoo.html").with_text("VkFoo"))
                .with_text(" for details."),
        );

        let out = raw(Style::CLion, &p);
        assert_eq!(
            out,
            " * See <a href=\"https://registry.khronos.org/vulkan/specs/1.3-extensions/man/html/VkFoo.html\">VkFoo</a> for details.<br><br>\n * \n"
        );
    }

    #[test]
    fn test_fragment_and_external_links() {
        let fragment = Element::new("a").with_attr("href", "#_members").with_text("members");
        assert_eq!(
            raw(Style::VsCode, &fragment),
            " * [members](https://example.com/page.html#_members)\n"
        );

        let external = Element::new("a")
            .with_attr("href", "https://www.khronos.org/")
            .with_text("Khronos");
        assert_eq!(
            raw(Style::CLion, &external),
            " * <a href=\"https://www.khronos.org/\">Khronos</a>\n"
        );
    }

    #[test]
    fn test_links_degrade_to_text() {
        let link = Element::new("a").with_attr("href", "VkFoo.html").with_text("VkFoo");
        assert_eq!(raw(Style::ReSharper, &link), " * VkFoo\n");
        assert_eq!(raw(Style::Txt, &link), "VkFoo\n");

        let unknown = Element::new("a").with_attr("href", "notes.txt").with_text("notes");
        assert_eq!(raw(Style::CLion, &unknown), " * notes\n");
    }

    #[test]
    fn test_empty_link_text_gets_placeholder() {
        let anchor = Element::new("a").with_attr("href", "#_anchor");
        assert_eq!(
            raw(Style::VsCode, &anchor),
            " * [↖](https://example.com/page.html#_anchor)\n"
        );
    }

    #[test]
    fn test_inline_formatting() {
        let p = Element::new("div").with_class("paragraph").with_child(
            Element::new("p")
                .with_child(Element::new("code").with_text("VkFoo"))
                .with_text(" must")
                .with_child(Element::new("strong").with_text("not"))
                .with_text(" be ")
                .with_child(Element::new("em").with_text("null")),
        );

        assert_eq!(
            raw(Style::CLion, &p),
            " * <b>VkFoo</b> must <b><i>not</i></b> be <i>null</i><br><br>\n * \n"
        );
        assert_eq!(
            raw(Style::VsCode, &p),
            " * **VkFoo** must ***not*** be *null*\n * \n"
        );
    }

    #[test]
    fn test_line_break_keeps_prefix() {
        let p = Element::new("div").with_class("paragraph").with_child(
            Element::new("p")
                .with_text("first")
                .with_child(Element::new("br"))
                .with_text("second"),
        );

        assert_eq!(raw(Style::CLion, &p), " * first<br>\n * second<br><br>\n * \n");
        assert_eq!(raw(Style::Txt, &p), "first\nsecond\n\n");
    }

    #[test]
    fn test_heading_self_link() {
        let heading = |tag: &str| {
            Element::new(tag)
                .with_child(Element::new("a").with_attr("href", "#_x"))
                .with_text("Title")
        };

        assert_eq!(
            raw(Style::VsCode, &heading("h2")),
            " * ## [↖](https://example.com/page.html#_x)Title\n * \n"
        );
        assert_eq!(
            raw(Style::VsCode, &heading("h3")),
            " * ### [↖](https://example.com/page.html#_x)Title\n * \n"
        );
        assert_eq!(
            raw(Style::CLion, &heading("h2")),
            " * <a href=\"https://example.com/page.html#_x\"></a><b>Title</b><hr>\n * \n"
        );
        assert_eq!(raw(Style::ReSharper, &heading("h2")), " * <b>Title</b><hr>\n * \n");
        assert_eq!(raw(Style::Txt, &heading("h2")), "Title\n\n");
    }

    #[test]
    fn test_heading_anchor_text_is_not_repeated() {
        let heading = Element::new("h2")
            .with_child(Element::new("a").with_attr("href", "#_members").with_text("Members"))
            .with_text(" of VkFoo");

        assert_eq!(
            raw(Style::VsCode, &heading),
            " * ## [Members](https://example.com/page.html#_members)of VkFoo\n * \n"
        );
    }

    #[test]
    fn test_list_before_linked_heading_becomes_break() {
        let body = section_body(vec![
            list("ul", &["a"]),
            Element::new("h2")
                .with_child(Element::new("a").with_attr("href", "#_m"))
                .with_text("Members"),
        ]);

        assert_eq!(
            finished(Style::CLion, &body),
            "/**\n * <ul>\n *     <li>a\n * <br>\n * \n * <a href=\"https://example.com/page.html#_m\"></a><b>Members</b><hr>\n */\n"
        );
    }

    #[test]
    fn test_heading_after_text_gets_one_blank_line() {
        let body = section_body(vec![
            paragraph("Text."),
            Element::new("h2").with_text("Members"),
            paragraph("More."),
        ]);

        assert_eq!(
            finished(Style::VsCode, &body),
            "/**\n * Text.\n * \n * ## Members\n * \n * More.\n */\n"
        );
    }

    #[test]
    fn test_adjacent_lists_merge_on_clion() {
        let body = section_body(vec![list("ul", &["a"]), list("ul", &["b"])]);

        assert_eq!(
            finished(Style::CLion, &body),
            "/**\n * <ul>\n *     <li>a\n *     <li>b\n * </ul>\n */\n"
        );
    }

    #[test]
    fn test_lists_stay_flat_elsewhere() {
        let body = section_body(vec![list("ul", &["a"]), list("ul", &["b"])]);

        assert_eq!(raw(Style::ReSharper, &body), " * - a\n * \n * - b\n * \n");
        assert_eq!(raw(Style::VsCode, &body), " * - a\n * \n * - b\n * \n");
        assert!(!finished(Style::ReSharper, &body).contains("<ul>"));
    }

    #[test]
    fn test_list_before_heading_becomes_break() {
        let body = section_body(vec![
            list("ul", &["a"]),
            Element::new("h2").with_text("Members"),
        ]);

        assert_eq!(
            finished(Style::CLion, &body),
            "/**\n * <ul>\n *     <li>a\n * <br>\n * \n * <b>Members</b><hr>\n */\n"
        );
    }

    #[test]
    fn test_definition_list_on_clion() {
        let dl = Element::new("dl")
            .with_child(Element::new("dt").with_text("flags"))
            .with_child(Element::new("dd").with_child(Element::new("p").with_text("Reserved.")));

        assert_eq!(
            finished(Style::CLion, &dl),
            "/**\n * <dl>\n *     <dt><b>flags</b>\n *     <dd>Reserved.\n * </dl>\n */\n"
        );
    }

    #[test]
    fn test_listing_per_style() {
        let listing = Element::new("div").with_class("listingblock").with_child(
            Element::new("div")
                .with_class("content")
                .with_child(Element::new("pre").with_text("typedef struct VkFoo {\n    int x;\n} VkFoo;")),
        );

        assert_eq!(
            raw(Style::CLion, &listing),
            " * @code\n * typedef struct VkFoo {\n *     int x;\n * } VkFoo;\n * @endcode\n * \n"
        );
        assert_eq!(
            raw(Style::VsCode, &listing),
            " * ```cpp\n * typedef struct VkFoo {\n *     int x;\n * } VkFoo;\n * ```\n * \n"
        );
        assert_eq!(
            finished(Style::Txt, &listing),
            "/**\ntypedef struct VkFoo {\n    int x;\n} VkFoo;\n*/\n"
        );
    }

    #[test]
    fn test_admonition_markers() {
        let note = Element::new("div").with_class("admonitionblock").with_child(
            Element::new("table").with_child(
                Element::new("tr")
                    .with_child(Element::new("td").with_class("icon").with_text("Note"))
                    .with_child(Element::new("td").with_class("content").with_text("Be careful.")),
            ),
        );

        assert_eq!(raw(Style::CLion, &note), " * @note Be careful.\n * \n");
        assert_eq!(raw(Style::VsCode, &note), " * **Note:** Be careful.\n * \n");
        assert_eq!(raw(Style::Txt, &note), "Be careful.\n\n");
    }

    #[test]
    fn test_math_span_renders_in_isolation() {
        let p = Element::new("div").with_class("paragraph").with_child(
            Element::new("p").with_text("where ").with_child(
                Element::new("span")
                    .with_class("eq")
                    .with_text("2")
                    .with_child(Element::new("sub").with_text("k")),
            ),
        );

        assert_eq!(raw(Style::CLion, &p), " * where 2<sub>k</sub><br><br>\n * \n");
        assert_eq!(raw(Style::VsCode, &p), " * where 2k\n * \n");
    }

    #[test]
    fn test_break_inside_math_span_stays_on_the_line() {
        let p = Element::new("div").with_class("paragraph").with_child(
            Element::new("p").with_text("where ").with_child(
                Element::new("span")
                    .with_class("eq")
                    .with_text("a")
                    .with_child(Element::new("br"))
                    .with_text("b"),
            ),
        );

        assert_eq!(raw(Style::CLion, &p), " * where a<br> b<br><br>\n * \n");
        assert_eq!(raw(Style::Txt, &p), "where a b\n\n");
    }

    #[test]
    fn test_subscript_notation_is_rewritten() {
        let body = paragraph("where a_b is the size");
        assert_eq!(
            finished(Style::VsCode, &body),
            "/**\n * where Ab is the size\n */\n"
        );
        assert_eq!(
            finished(Style::ReSharper, &body),
            "/**\n * where a<sub>b</sub> is the size<br>\n */\n"
        );
    }

    #[test]
    fn test_tables_follow_style() {
        let table = Element::new("table")
            .with_child(
                Element::new("tr")
                    .with_child(Element::new("th").with_text("Name"))
                    .with_child(Element::new("th").with_text("Value")),
            )
            .with_child(
                Element::new("tr")
                    .with_child(Element::new("td").with_text("x"))
                    .with_child(Element::new("td").with_text("1")),
            );

        let clion = raw(Style::CLion, &table);
        assert!(clion.starts_with(" * <pre>\n"));
        assert!(clion.contains(" * |  Name  |  Value  |<br>\n"));
        assert!(clion.ends_with(" * </pre><br>\n * \n"));

        assert_eq!(raw(Style::ReSharper, &table), "");
    }

    #[test]
    fn test_unknown_elements_pass_through() {
        let section = Element::new("section").with_child(Element::new("article").with_text("inside"));
        assert_eq!(raw(Style::Txt, &section), "inside");
    }

    #[test]
    fn test_add_as_overrides_kind() {
        let mut block = DocumentationBlock::new(Style::CLion, PAGE, 0);
        let context = block.context();
        let body: Node = section_body(vec![Element::new("p").with_text("Overview.")]).into();

        block.add_as(&body, "paragraph", &context).unwrap();
        assert_eq!(block.as_str(), " * Overview.<br><br>\n * \n");
    }

    #[test]
    fn test_add_as_rejects_unmodeled_kinds() {
        let mut block = DocumentationBlock::new(Style::CLion, PAGE, 0);
        let context = block.context();
        let node: Node = Element::new("div").with_text("x").into();

        assert!(block.add_as(&node, "marquee", &context).is_err());
        assert!(block.is_empty());
    }

    #[test]
    fn test_comment_delimiters_in_code_are_neutralized() {
        let listing = Element::new("div")
            .with_class("listingblock")
            .with_child(Element::new("pre").with_text("int x; /* unused */"));

        let out = finished(Style::CLion, &listing);
        assert!(out.contains(" * int x; ⧸* unused *⧸\n"));
        assert!(out.ends_with(" */\n"));
        assert_eq!(out.matches("*/").count(), 1);
    }
}

#[cfg(test)]
mod record_tests {
    use crate::*;

    fn paragraph(text: &str) -> Element {
        Element::new("div")
            .with_class("paragraph")
            .with_child(Element::new("p").with_text(text))
    }

    fn overview(text: &str) -> Element {
        Element::new("div")
            .with_class("sectionbody")
            .with_child(paragraph(text))
    }

    fn section(title: &str, children: Vec<Element>) -> Element {
        let body = children
            .into_iter()
            .fold(Element::new("div").with_class("sectionbody"), |body, child| {
                body.with_child(child)
            });
        Element::new("div")
            .with_class("sect1")
            .with_child(Element::new("h2").with_text(title))
            .with_child(body)
    }

    fn page() -> Node {
        Element::new("html")
            .with_child(
                Element::new("div")
                    .with_attr("id", "header")
                    .with_child(Element::new("h1").with_text("vkFoo(3)"))
                    .with_child(Element::new("h2").with_text("Name"))
                    .with_child(overview("vkFoo - Do foo")),
            )
            .with_child(
                Element::new("div")
                    .with_attr("id", "content")
                    .with_child(section("C Specification", vec![paragraph("Call it.")]))
                    .with_child(section("See Also", vec![paragraph("vkBar")])),
            )
            .into()
    }

    fn vk_result() -> Record {
        Record::new(
            "VkResult",
            Element::new("h2").with_text("VkResult"),
            overview("Success and error codes."),
        )
    }

    #[test]
    fn test_heading_and_overview_in_plain_text() {
        let renderer = RecordRenderer::new(RenderOptions::new(Style::Txt, false));
        assert_eq!(
            renderer.render(&vk_result()),
            "/**\nVkResult\n\nSuccess and error codes.\n*/\n"
        );
    }

    #[test]
    fn test_heading_and_overview_per_style() {
        let render = |style| RecordRenderer::new(RenderOptions::new(style, false)).render(&vk_result());

        assert_eq!(
            render(Style::CLion),
            "/**\n * <b>VkResult</b><hr>\n * \n * Success and error codes.<br><br>\n */\n"
        );
        assert_eq!(
            render(Style::ReSharper),
            "/**\n * <b>VkResult</b><hr>\n * \n * Success and error codes.<br>\n */\n"
        );
        assert_eq!(
            render(Style::VsCode),
            "/**\n * ## VkResult\n * \n * Success and error codes.\n */\n"
        );
    }

    #[test]
    fn test_namespace_indents_every_line() {
        let renderer = RecordRenderer::new(RenderOptions::new(Style::VsCode, true));
        assert_eq!(
            renderer.render(&vk_result()),
            "    /**\n     * ## VkResult\n     * \n     * Success and error codes.\n     */\n"
        );
    }

    #[test]
    fn test_from_page_skips_excluded_sections() {
        let record = Record::from_page("vkFoo", &page()).unwrap();

        assert_eq!(record.heading.text_content(), "Name");
        assert_eq!(record.overview.text_content(), "vkFoo - Do foo");
        assert_eq!(record.sections.len(), 1);
        assert_eq!(
            record.url(),
            "https://registry.khronos.org/vulkan/specs/1.3-extensions/man/html/vkFoo.html"
        );
    }

    #[test]
    fn test_render_page() {
        let renderer = RecordRenderer::new(RenderOptions::new(Style::Txt, false));
        let out = renderer.render_page("vkFoo", &page()).unwrap();

        assert_eq!(
            out,
            "/**\nName\n\nvkFoo - Do foo\n\nC Specification\n\nCall it.\n*/\n"
        );
    }

    #[test]
    fn test_page_without_heading_is_not_documented() {
        let page: Node = Element::new("html")
            .with_child(Element::new("div").with_attr("id", "content"))
            .into();
        assert!(Record::from_page("vkFoo", &page).is_none());
        assert!(RecordRenderer::default().render_page("vkFoo", &page).is_none());
    }

    #[test]
    fn test_excluded_sections_are_never_rendered() {
        let record = vk_result()
            .with_section(section("Description", vec![paragraph("Codes.")]))
            .with_section(section("Copyright", vec![paragraph("Khronos")]));

        let out = RecordRenderer::default().render(&record);
        assert!(out.contains("Description"));
        assert!(!out.contains("Copyright"));
        assert!(!out.contains("Khronos"));
    }

    #[test]
    fn test_every_line_carries_the_prefix() {
        let table = Element::new("table").with_child(
            Element::new("tr")
                .with_child(Element::new("td").with_text("a"))
                .with_child(Element::new("td").with_text("b")),
        );
        let listing = Element::new("div")
            .with_class("listingblock")
            .with_child(Element::new("pre").with_text("void f();"));
        let list = Element::new("ul")
            .with_child(Element::new("li").with_text("one"))
            .with_child(Element::new("li").with_text("two"));

        let record = vk_result().with_section(section(
            "Description",
            vec![paragraph("Text."), list, table, listing],
        ));

        for style in Style::ALL {
            let out = RecordRenderer::new(RenderOptions::new(style, true)).render(&record);
            let lines: Vec<&str> = out.lines().collect();
            let prefix = style.prefix(1);

            assert_eq!(lines[0], style.opening(1), "style {}", style);
            assert_eq!(*lines.last().unwrap(), style.closing(1), "style {}", style);
            for line in &lines[1..lines.len() - 1] {
                assert!(line.starts_with(&prefix), "style {}: {:?}", style, line);
                assert!(!line.contains("*/"), "style {}: {:?}", style, line);
            }
        }
    }

    #[test]
    fn test_finish_is_stable() {
        let record = vk_result().with_section(section(
            "Description",
            vec![paragraph("Text."), Element::new("ul").with_child(Element::new("li").with_text("a"))],
        ));

        for style in Style::ALL {
            let out = RecordRenderer::new(RenderOptions::new(style, false)).render(&record);
            let body = out
                .strip_prefix(&format!("{}\n", style.opening(0)))
                .and_then(|b| b.strip_suffix(&format!("{}\n", style.closing(0))))
                .unwrap();
            let prefix = style.prefix(0);
            assert_eq!(collapse(body, style, &prefix), body, "style {}", style);
        }
    }
}
