use crate::tree::TreeNode;

/// Built-in skeleton: an Express service exposing device and messaging routes.
pub fn default_tree() -> TreeNode {
    let empty = TreeNode::empty_file;

    TreeNode::dir([
        ("package.json", empty()),
        ("index.js", empty()),
        ("config.js", empty()),
        (
            "src",
            TreeNode::dir([
                (
                    "models",
                    TreeNode::dir([("Client.js", empty()), ("Device.js", empty())]),
                ),
                (
                    "controllers",
                    TreeNode::dir([
                        ("deviceController.js", empty()),
                        ("messageController.js", empty()),
                    ]),
                ),
                (
                    "routes",
                    TreeNode::dir([
                        ("deviceRoutes.js", empty()),
                        ("messageRoutes.js", empty()),
                    ]),
                ),
                (
                    "services",
                    TreeNode::dir([("clientService.js", empty()), ("qrService.js", empty())]),
                ),
                ("middleware", TreeNode::dir([("logger.js", empty())])),
                ("utils", TreeNode::dir([("logger.js", empty())])),
            ]),
        ),
        (
            "public",
            TreeNode::dir([
                ("qr-scanner.html", empty()),
                ("js", TreeNode::dir([("qr-scanner.js", empty())])),
                ("css", TreeNode::dir([("style.css", empty())])),
            ]),
        ),
    ])
}
